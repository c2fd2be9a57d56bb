//! `PostgreSQL` implementation of the booking store.
//!
//! Queries use sqlx's runtime API with `FromRow` models; the column lists
//! mirror the migrations in `crates/api/migrations/`.

use async_trait::async_trait;
use sqlx::PgPool;

use brightnest_core::{BookingId, PromoCodeId, ServiceId};

use super::{BookingStore, StoreError};
use crate::models::{
    Booking, Customer, Enquiry, NewBooking, NewCustomer, NewEnquiry, PromoCode, Service,
};

const CUSTOMER_COLUMNS: &str = "id, name, email, phone, address, customer_type, location, created_at";
const SERVICE_COLUMNS: &str = "id, name, description, base_price, is_addon, is_active, created_at";
const PROMO_COLUMNS: &str =
    "id, code, discount_type, discount_value, max_discount_amount, is_active, used_count, created_at";
const BOOKING_COLUMNS: &str = "id, customer_id, service_id, addon_services, booking_date, \
     booking_time, total_amount, promo_code_id, discount_amount, final_amount, notes, status, \
     created_at";

/// Store backed by the `booking` schema in `PostgreSQL`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store on top of an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM booking.customers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError> {
        let row = sqlx::query_as::<_, Customer>(&format!(
            "INSERT INTO booking.customers (name, email, phone, address, customer_type, location)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {CUSTOMER_COLUMNS}"
        ))
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.address)
        .bind(new.customer_type)
        .bind(new.location)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return StoreError::Conflict("email already exists".to_owned());
            }
            StoreError::Database(e)
        })?;

        Ok(row)
    }

    async fn find_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError> {
        let row = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM booking.services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_services(&self, ids: &[ServiceId]) -> Result<Vec<Service>, StoreError> {
        let rows = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM booking.services WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_active_services(&self) -> Result<Vec<Service>, StoreError> {
        let rows = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM booking.services
             WHERE is_active = TRUE
             ORDER BY is_addon ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_active_promo(&self, code: &str) -> Result<Option<PromoCode>, StoreError> {
        let row = sqlx::query_as::<_, PromoCode>(&format!(
            "SELECT {PROMO_COLUMNS} FROM booking.promo_codes
             WHERE code = $1 AND is_active = TRUE"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn insert_booking(&self, new: NewBooking) -> Result<Booking, StoreError> {
        let row = sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO booking.bookings
                 (customer_id, service_id, addon_services, booking_date, booking_time,
                  total_amount, promo_code_id, discount_amount, final_amount, notes, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {BOOKING_COLUMNS}"
        ))
        .bind(new.customer_id)
        .bind(new.service_id)
        .bind(new.addon_services)
        .bind(new.booking_date)
        .bind(new.booking_time)
        .bind(new.total_amount)
        .bind(new.promo_code_id)
        .bind(new.discount_amount)
        .bind(new.final_amount)
        .bind(new.notes)
        .bind(new.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM booking.bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_promo_usage(
        &self,
        id: PromoCodeId,
        used_count: i32,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE booking.promo_codes SET used_count = $2 WHERE id = $1")
            .bind(id)
            .bind(used_count)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn insert_enquiry(&self, new: NewEnquiry) -> Result<Enquiry, StoreError> {
        let row = sqlx::query_as::<_, Enquiry>(
            "INSERT INTO booking.enquiries (customer_id, service_id, message)
             VALUES ($1, $2, $3)
             RETURNING id, customer_id, service_id, message, created_at",
        )
        .bind(new.customer_id)
        .bind(new.service_id)
        .bind(new.message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
