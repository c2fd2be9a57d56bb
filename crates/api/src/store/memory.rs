//! In-memory implementation of the booking store.
//!
//! Implements [`BookingStore`] entirely in memory using `HashMap`s guarded
//! by a `tokio::sync::RwLock`. It exists for:
//! - tests (router and workflow tests run against it with no external
//!   dependencies)
//! - local development without a `PostgreSQL` instance
//!
//! Not durable: all state is lost on process restart. Ids are assigned from
//! process-local counters, so they match the serial columns of the Postgres
//! backend only in shape, not in value.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use brightnest_core::{
    BookingId, CustomerId, DiscountType, EnquiryId, PromoCodeId, ServiceId,
};

use super::{BookingStore, StoreError};
use crate::models::{
    Booking, Customer, Enquiry, NewBooking, NewCustomer, NewEnquiry, PromoCode, Service,
};

#[derive(Default)]
struct Inner {
    customers: HashMap<i32, Customer>,
    services: HashMap<i32, Service>,
    promo_codes: HashMap<i32, PromoCode>,
    bookings: HashMap<i32, Booking>,
    enquiries: HashMap<i32, Enquiry>,
    next_id: i32,
}

impl Inner {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// `HashMap`-backed store for tests and local development.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active service to the catalog and return it.
    pub async fn add_service(&self, name: &str, base_price: Decimal, is_addon: bool) -> Service {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let service = Service {
            id: ServiceId::new(id),
            name: name.to_owned(),
            description: None,
            base_price,
            is_addon,
            is_active: true,
            created_at: Utc::now(),
        };
        inner.services.insert(id, service.clone());
        service
    }

    /// Add a percentage promo code and return it.
    pub async fn add_percentage_promo(
        &self,
        code: &str,
        discount_value: Decimal,
        max_discount_amount: Option<Decimal>,
        is_active: bool,
    ) -> PromoCode {
        self.add_promo(code, DiscountType::Percentage, discount_value, max_discount_amount, is_active)
            .await
    }

    /// Add a fixed-amount promo code and return it.
    pub async fn add_fixed_promo(
        &self,
        code: &str,
        discount_value: Decimal,
        is_active: bool,
    ) -> PromoCode {
        self.add_promo(code, DiscountType::Fixed, discount_value, None, is_active)
            .await
    }

    async fn add_promo(
        &self,
        code: &str,
        discount_type: DiscountType,
        discount_value: Decimal,
        max_discount_amount: Option<Decimal>,
        is_active: bool,
    ) -> PromoCode {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let promo = PromoCode {
            id: PromoCodeId::new(id),
            code: code.to_uppercase(),
            discount_type,
            discount_value,
            max_discount_amount,
            is_active,
            used_count: 0,
            created_at: Utc::now(),
        };
        inner.promo_codes.insert(id, promo.clone());
        promo
    }

    /// Number of customer rows currently stored.
    pub async fn customer_count(&self) -> usize {
        self.inner.read().await.customers.len()
    }

    /// Read a promo code's usage counter regardless of its active flag.
    pub async fn promo_used_count(&self, id: PromoCodeId) -> Option<i32> {
        self.inner
            .read()
            .await
            .promo_codes
            .get(&id.as_i32())
            .map(|p| p.used_count)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .customers
            .values()
            .find(|c| c.email.as_str() == email)
            .cloned())
    }

    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .customers
            .values()
            .any(|c| c.email.as_str() == new.email.as_str())
        {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }
        let id = inner.next_id();
        let customer = Customer {
            id: CustomerId::new(id),
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            customer_type: new.customer_type,
            location: new.location,
            created_at: Utc::now(),
        };
        inner.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn find_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.services.get(&id.as_i32()).cloned())
    }

    async fn find_services(&self, ids: &[ServiceId]) -> Result<Vec<Service>, StoreError> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.services.get(&id.as_i32()).cloned())
            .collect())
    }

    async fn list_active_services(&self) -> Result<Vec<Service>, StoreError> {
        let inner = self.inner.read().await;
        let mut services: Vec<Service> = inner
            .services
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        services.sort_by(|a, b| a.is_addon.cmp(&b.is_addon).then(a.name.cmp(&b.name)));
        Ok(services)
    }

    async fn find_active_promo(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .promo_codes
            .values()
            .find(|p| p.is_active && p.code == code)
            .cloned())
    }

    async fn insert_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let booking = Booking {
            id: BookingId::new(id),
            customer_id: new.customer_id,
            service_id: new.service_id,
            addon_services: new.addon_services,
            booking_date: new.booking_date,
            booking_time: new.booking_time,
            total_amount: new.total_amount,
            promo_code_id: new.promo_code_id,
            discount_amount: new.discount_amount,
            final_amount: new.final_amount,
            notes: new.notes,
            status: new.status,
            created_at: Utc::now(),
        };
        inner.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.bookings.get(&id.as_i32()).cloned())
    }

    async fn update_promo_usage(
        &self,
        id: PromoCodeId,
        used_count: i32,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.promo_codes.get_mut(&id.as_i32()) {
            Some(promo) => {
                promo.used_count = used_count;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn insert_enquiry(&self, new: NewEnquiry) -> Result<Enquiry, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id();
        let enquiry = Enquiry {
            id: EnquiryId::new(id),
            customer_id: new.customer_id,
            service_id: new.service_id,
            message: new.message,
            created_at: Utc::now(),
        };
        inner.enquiries.insert(id, enquiry.clone());
        Ok(enquiry)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
