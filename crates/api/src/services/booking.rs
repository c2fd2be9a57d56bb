//! Booking creation workflow.
//!
//! One linear procedure with five steps, each a storage operation:
//!
//! 1. Resolve the customer by email (find-or-create).
//! 2. Price the primary service and sum resolved add-ons.
//! 3. Evaluate the optional promo code into a discount.
//! 4. Insert the booking with computed totals, status `pending`.
//! 5. Increment the promo code's usage counter (best effort).
//!
//! Steps run strictly in order with no transaction spanning them. Any
//! failure before the booking insert aborts the request; writes already
//! committed (the customer row) are retained. The insert is the point of no
//! return: a failure in step 5 is logged and the request still succeeds.
//!
//! Input is validated at the HTTP edge before this module runs; everything
//! here assumes a well-formed request.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use brightnest_core::{
    BookingId, BookingStatus, CustomerId, CustomerType, DiscountType, Email, PromoCodeId,
    ServiceId,
};

use crate::models::{NewBooking, NewCustomer, PromoCode};
use crate::store::{BookingStore, StoreError};

/// Errors from the booking workflow.
///
/// The variants track which step failed so the HTTP layer can report the
/// step-specific message the client expects.
#[derive(Debug, Error)]
pub enum BookingError {
    /// The primary service id does not resolve.
    #[error("invalid service ID")]
    InvalidService,

    /// Customer lookup or insert failed (including a lost duplicate race).
    #[error("customer resolution failed: {0}")]
    Customer(#[source] StoreError),

    /// The booking insert itself failed.
    #[error("booking insert failed: {0}")]
    Write(#[source] StoreError),

    /// Any other storage failure (pricing or promo lookup).
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Customer fields accepted with a booking or enquiry.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub location: Option<String>,
}

/// Validated input for the booking workflow.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub customer: CustomerDetails,
    pub service_id: ServiceId,
    pub addon_services: Vec<ServiceId>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
    pub promo_code: Option<String>,
    pub notes: Option<String>,
}

/// What the client gets back after a successful booking.
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking_id: BookingId,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

/// A promo code matched during evaluation, with the usage counter as read
/// at that moment. The usage update later writes `used_count + 1` from this
/// snapshot rather than re-reading, so concurrent bookings on the same code
/// can under-count. Accepted limitation.
#[derive(Debug, Clone, Copy)]
struct AppliedPromo {
    id: PromoCodeId,
    discount: Decimal,
    used_count_at_evaluation: i32,
}

/// Run the booking creation workflow.
///
/// # Errors
///
/// Returns [`BookingError::InvalidService`] when the primary service id does
/// not resolve, and a step-tagged storage error for any infrastructure
/// failure before the booking insert succeeds.
pub async fn create_booking(
    store: &dyn BookingStore,
    request: BookingRequest,
) -> Result<BookingConfirmation, BookingError> {
    let customer_id = resolve_customer(store, request.customer)
        .await
        .map_err(BookingError::Customer)?;

    let total_amount = price_services(store, request.service_id, &request.addon_services).await?;

    let promo = evaluate_promo(store, request.promo_code.as_deref(), total_amount).await?;
    let (promo_code_id, discount_amount) = promo.map_or((None, Decimal::ZERO), |p| {
        (Some(p.id), p.discount)
    });
    let final_amount = total_amount - discount_amount;

    let booking = store
        .insert_booking(NewBooking {
            customer_id,
            service_id: request.service_id,
            addon_services: request.addon_services,
            booking_date: request.booking_date,
            booking_time: request.booking_time,
            total_amount,
            promo_code_id,
            discount_amount,
            final_amount,
            notes: request.notes,
            status: BookingStatus::Pending,
        })
        .await
        .map_err(BookingError::Write)?;

    tracing::info!(
        booking_id = %booking.id,
        customer_id = %customer_id,
        %total_amount,
        %final_amount,
        "Booking created"
    );

    // Point of no return passed: the booking exists, so a failed counter
    // update is logged and the request still succeeds.
    if let Some(p) = promo {
        if let Err(e) = store
            .update_promo_usage(p.id, p.used_count_at_evaluation + 1)
            .await
        {
            tracing::warn!(
                promo_code_id = %p.id,
                error = %e,
                "Failed to update promo code usage after booking creation"
            );
        }
    }

    Ok(BookingConfirmation {
        booking_id: booking.id,
        total_amount,
        discount_amount,
        final_amount,
    })
}

/// Find a customer by email or create one.
///
/// An existing row wins unchanged: differing contact details in the incoming
/// payload are ignored, there is no update path here. The find-then-insert
/// is not atomic; a concurrent request for the same new email can make the
/// insert fail on the unique index, which surfaces as a storage error.
///
/// # Errors
///
/// Returns the underlying [`StoreError`] if either the lookup or the insert
/// fails. No retry is attempted.
pub async fn resolve_customer(
    store: &dyn BookingStore,
    details: CustomerDetails,
) -> Result<CustomerId, StoreError> {
    if let Some(existing) = store.find_customer_by_email(details.email.as_str()).await? {
        return Ok(existing.id);
    }

    let created = store
        .insert_customer(NewCustomer {
            name: details.name,
            email: details.email,
            phone: details.phone,
            address: details.address,
            customer_type: details.customer_type.unwrap_or_default(),
            location: details.location,
        })
        .await?;

    tracing::debug!(customer_id = %created.id, "Created customer");
    Ok(created.id)
}

/// Price the primary service and sum the resolved add-ons.
async fn price_services(
    store: &dyn BookingStore,
    service_id: ServiceId,
    addon_ids: &[ServiceId],
) -> Result<Decimal, BookingError> {
    let service = store
        .find_service(service_id)
        .await?
        .ok_or(BookingError::InvalidService)?;

    let mut total = service.base_price;
    if !addon_ids.is_empty() {
        // Add-on ids that don't resolve are dropped by the batch lookup and
        // excluded from the sum without error.
        let addons = store.find_services(addon_ids).await?;
        total += addons.iter().map(|s| s.base_price).sum::<Decimal>();
    }

    Ok(total)
}

/// Evaluate an optional promo code against the order total.
///
/// Checkout is lenient: no code, an unknown code, and an inactive code all
/// evaluate to "no discount" rather than an error. The standalone
/// `/api/promo/validate` endpoint is the strict counterpart.
async fn evaluate_promo(
    store: &dyn BookingStore,
    code: Option<&str>,
    total_amount: Decimal,
) -> Result<Option<AppliedPromo>, StoreError> {
    let Some(code) = code else {
        return Ok(None);
    };
    let normalized = code.trim().to_uppercase();
    if normalized.is_empty() {
        return Ok(None);
    }

    let Some(promo) = store.find_active_promo(&normalized).await? else {
        tracing::debug!(code = %normalized, "Promo code not applied (unknown or inactive)");
        return Ok(None);
    };

    Ok(Some(AppliedPromo {
        id: promo.id,
        discount: compute_discount(&promo, total_amount),
        used_count_at_evaluation: promo.used_count,
    }))
}

/// Compute the discount a promo code grants on an order total.
///
/// Percentage codes are clamped to `max_discount_amount` when the cap is
/// set. Flat codes are not clamped against the total: a code larger than
/// the order yields a negative final amount downstream.
#[must_use]
pub fn compute_discount(promo: &PromoCode, total_amount: Decimal) -> Decimal {
    match promo.discount_type {
        DiscountType::Percentage => {
            let discount = total_amount * promo.discount_value / Decimal::ONE_HUNDRED;
            promo
                .max_discount_amount
                .map_or(discount, |cap| discount.min(cap))
        }
        DiscountType::Fixed => promo.discount_value,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::models::{Booking, Customer, Enquiry, NewEnquiry, Service};
    use crate::store::MemoryStore;

    use super::*;

    fn details(email: &str) -> CustomerDetails {
        CustomerDetails {
            name: "Astrid Berg".to_owned(),
            email: Email::parse(email).unwrap(),
            phone: Some("+47 900 00 000".to_owned()),
            address: None,
            customer_type: None,
            location: Some("Bergen".to_owned()),
        }
    }

    fn request(email: &str, service_id: ServiceId) -> BookingRequest {
        BookingRequest {
            customer: details(email),
            service_id,
            addon_services: Vec::new(),
            booking_date: None,
            booking_time: None,
            promo_code: None,
            notes: None,
        }
    }

    fn percentage_promo(value: i64, cap: Option<i64>) -> PromoCode {
        PromoCode {
            id: PromoCodeId::new(1),
            code: "TEST".to_owned(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::from(value),
            max_discount_amount: cap.map(Decimal::from),
            is_active: true,
            used_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_discount_clamped_to_cap() {
        let promo = percentage_promo(10, Some(20));
        assert_eq!(
            compute_discount(&promo, Decimal::from(300)),
            Decimal::from(20)
        );
    }

    #[test]
    fn test_percentage_discount_below_cap() {
        let promo = percentage_promo(10, Some(20));
        assert_eq!(
            compute_discount(&promo, Decimal::from(150)),
            Decimal::from(15)
        );
    }

    #[test]
    fn test_percentage_discount_uncapped() {
        let promo = percentage_promo(25, None);
        assert_eq!(
            compute_discount(&promo, Decimal::from(400)),
            Decimal::from(100)
        );
    }

    #[test]
    fn test_fixed_discount_not_clamped_to_total() {
        let promo = PromoCode {
            discount_type: DiscountType::Fixed,
            discount_value: Decimal::from(50),
            ..percentage_promo(0, None)
        };
        assert_eq!(
            compute_discount(&promo, Decimal::from(30)),
            Decimal::from(50)
        );
    }

    #[tokio::test]
    async fn test_booking_without_promo() {
        let store = MemoryStore::new();
        let service = store.add_service("Deep clean", Decimal::from(180), false).await;

        let confirmation = create_booking(&store, request("astrid@example.com", service.id))
            .await
            .unwrap();

        assert_eq!(confirmation.total_amount, Decimal::from(180));
        assert_eq!(confirmation.discount_amount, Decimal::ZERO);
        assert_eq!(confirmation.final_amount, Decimal::from(180));

        let booking = store
            .find_booking(confirmation.booking_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.promo_code_id, None);
    }

    #[tokio::test]
    async fn test_existing_customer_is_reused_unchanged() {
        let store = MemoryStore::new();
        let service = store.add_service("Deep clean", Decimal::from(180), false).await;

        let first = create_booking(&store, request("astrid@example.com", service.id))
            .await
            .unwrap();

        // Same email, different contact details: the stored row wins.
        let mut second_request = request("astrid@example.com", service.id);
        second_request.customer.name = "A. Berg".to_owned();
        second_request.customer.phone = Some("+47 111 11 111".to_owned());
        let second = create_booking(&store, second_request).await.unwrap();

        assert_ne!(first.booking_id, second.booking_id);
        assert_eq!(store.customer_count().await, 1);

        let stored = store
            .find_customer_by_email("astrid@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.name, "Astrid Berg");
        assert_eq!(stored.phone.as_deref(), Some("+47 900 00 000"));
    }

    #[tokio::test]
    async fn test_new_customer_defaults_to_individual() {
        let store = MemoryStore::new();
        let service = store.add_service("Deep clean", Decimal::from(180), false).await;

        create_booking(&store, request("astrid@example.com", service.id))
            .await
            .unwrap();

        let stored = store
            .find_customer_by_email("astrid@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.customer_type, CustomerType::Individual);
    }

    #[tokio::test]
    async fn test_invalid_service_fails_but_customer_persists() {
        let store = MemoryStore::new();

        let result = create_booking(
            &store,
            request("astrid@example.com", ServiceId::new(999)),
        )
        .await;

        assert!(matches!(result, Err(BookingError::InvalidService)));
        // Customer resolution runs before the service lookup, so the row
        // outlives the failed booking.
        assert!(
            store
                .find_customer_by_email("astrid@example.com")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_unresolved_addons_are_silently_excluded() {
        let store = MemoryStore::new();
        let service = store.add_service("Deep clean", Decimal::from(180), false).await;
        let addon = store.add_service("Window wash", Decimal::from(40), true).await;

        let mut req = request("astrid@example.com", service.id);
        req.addon_services = vec![addon.id, ServiceId::new(999)];
        let confirmation = create_booking(&store, req).await.unwrap();

        assert_eq!(confirmation.total_amount, Decimal::from(220));
    }

    #[tokio::test]
    async fn test_percentage_promo_capped_and_counted() {
        let store = MemoryStore::new();
        let service = store.add_service("Deep clean", Decimal::from(250), false).await;
        let addon = store.add_service("Window wash", Decimal::from(50), true).await;
        let promo = store
            .add_percentage_promo("SAVE10", Decimal::from(10), Some(Decimal::from(20)), true)
            .await;

        let mut req = request("astrid@example.com", service.id);
        req.addon_services = vec![addon.id];
        // Lowercase input; lookup happens after uppercasing.
        req.promo_code = Some("save10".to_owned());
        let confirmation = create_booking(&store, req).await.unwrap();

        assert_eq!(confirmation.total_amount, Decimal::from(300));
        assert_eq!(confirmation.discount_amount, Decimal::from(20));
        assert_eq!(confirmation.final_amount, Decimal::from(280));
        assert_eq!(store.promo_used_count(promo.id).await, Some(1));

        let booking = store
            .find_booking(confirmation.booking_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booking.promo_code_id, Some(promo.id));
    }

    #[tokio::test]
    async fn test_fixed_promo_can_go_negative() {
        let store = MemoryStore::new();
        let service = store.add_service("Key handover", Decimal::from(30), false).await;
        store
            .add_fixed_promo("WELCOME50", Decimal::from(50), true)
            .await;

        let mut req = request("astrid@example.com", service.id);
        req.promo_code = Some("WELCOME50".to_owned());
        let confirmation = create_booking(&store, req).await.unwrap();

        assert_eq!(confirmation.discount_amount, Decimal::from(50));
        assert_eq!(confirmation.final_amount, Decimal::from(-20));
    }

    #[tokio::test]
    async fn test_inactive_promo_is_silently_ignored() {
        let store = MemoryStore::new();
        let service = store.add_service("Deep clean", Decimal::from(180), false).await;
        let promo = store
            .add_percentage_promo("EXPIRED", Decimal::from(10), None, false)
            .await;

        let mut req = request("astrid@example.com", service.id);
        req.promo_code = Some("EXPIRED".to_owned());
        let confirmation = create_booking(&store, req).await.unwrap();

        assert_eq!(confirmation.discount_amount, Decimal::ZERO);
        assert_eq!(confirmation.final_amount, Decimal::from(180));
        assert_eq!(store.promo_used_count(promo.id).await, Some(0));
    }

    /// Delegates everything to a [`MemoryStore`] but fails usage updates,
    /// to exercise the best-effort step in isolation.
    struct FailingUsageStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl crate::store::BookingStore for FailingUsageStore {
        async fn find_customer_by_email(
            &self,
            email: &str,
        ) -> Result<Option<Customer>, StoreError> {
            self.inner.find_customer_by_email(email).await
        }

        async fn insert_customer(
            &self,
            new: crate::models::NewCustomer,
        ) -> Result<Customer, StoreError> {
            self.inner.insert_customer(new).await
        }

        async fn find_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
            self.inner.find_service(id).await
        }

        async fn find_services(&self, ids: &[ServiceId]) -> Result<Vec<Service>, StoreError> {
            self.inner.find_services(ids).await
        }

        async fn list_active_services(&self) -> Result<Vec<Service>, StoreError> {
            self.inner.list_active_services().await
        }

        async fn find_active_promo(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
            self.inner.find_active_promo(code).await
        }

        async fn insert_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
            self.inner.insert_booking(new).await
        }

        async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
            self.inner.find_booking(id).await
        }

        async fn update_promo_usage(
            &self,
            _id: PromoCodeId,
            _used_count: i32,
        ) -> Result<(), StoreError> {
            Err(StoreError::NotFound)
        }

        async fn insert_enquiry(&self, new: NewEnquiry) -> Result<Enquiry, StoreError> {
            self.inner.insert_enquiry(new).await
        }

        async fn health_check(&self) -> Result<(), StoreError> {
            self.inner.health_check().await
        }
    }

    #[tokio::test]
    async fn test_usage_update_failure_does_not_fail_booking() {
        let store = FailingUsageStore {
            inner: MemoryStore::new(),
        };
        let service = store
            .inner
            .add_service("Deep clean", Decimal::from(180), false)
            .await;
        let promo = store
            .inner
            .add_percentage_promo("SAVE10", Decimal::from(10), None, true)
            .await;

        let mut req = request("astrid@example.com", service.id);
        req.promo_code = Some("SAVE10".to_owned());
        let confirmation = create_booking(&store, req).await.unwrap();

        // The discount applied and the booking stands even though the
        // counter write failed.
        assert_eq!(confirmation.discount_amount, Decimal::from(18));
        assert!(
            store
                .inner
                .find_booking(confirmation.booking_id)
                .await
                .unwrap()
                .is_some()
        );
        assert_eq!(store.inner.promo_used_count(promo.id).await, Some(0));
    }
}
