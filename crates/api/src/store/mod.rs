//! Storage access for the booking schema.
//!
//! The workflow and route handlers never talk to a database driver directly;
//! they go through the [`BookingStore`] trait and receive the concrete
//! backend as an argument. Two implementations exist:
//!
//! - [`postgres::PgStore`] - the production backend (schema `booking`,
//!   migrations in `crates/api/migrations/`, run via `bn-cli migrate`)
//! - [`memory::MemoryStore`] - `HashMap`-backed, for tests and local
//!   development without a database
//!
//! Reads and writes are individual operations; there is no transaction
//! spanning the booking workflow's steps, and the find-then-insert /
//! read-then-write patterns on customers and promo usage counters are
//! intentionally left racy (the unique email index turns the customer race
//! into a [`StoreError::Conflict`]).

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use brightnest_core::{BookingId, PromoCodeId, ServiceId};

use crate::models::{
    Booking, Customer, Enquiry, NewBooking, NewCustomer, NewEnquiry, PromoCode, Service,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage operations the booking API needs.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Look up a customer by exact email match.
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, StoreError>;

    /// Insert a new customer. Fails with [`StoreError::Conflict`] when the
    /// email is already taken (e.g., a concurrent insert won the race).
    async fn insert_customer(&self, new: NewCustomer) -> Result<Customer, StoreError>;

    /// Fetch a single service by id.
    async fn find_service(&self, id: ServiceId) -> Result<Option<Service>, StoreError>;

    /// Batch-fetch services by id. Ids that do not resolve are simply
    /// absent from the result; the caller decides whether that matters.
    async fn find_services(&self, ids: &[ServiceId]) -> Result<Vec<Service>, StoreError>;

    /// All active services, primary and add-on, for the catalog listing.
    async fn list_active_services(&self) -> Result<Vec<Service>, StoreError>;

    /// Look up an active promo code by exact (already-uppercased) code.
    /// Inactive and unknown codes both come back as `None`.
    async fn find_active_promo(&self, code: &str) -> Result<Option<PromoCode>, StoreError>;

    /// Insert a new booking and return the persisted row.
    async fn insert_booking(&self, new: NewBooking) -> Result<Booking, StoreError>;

    /// Fetch a single booking by id.
    async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Overwrite a promo code's usage counter with the given value.
    ///
    /// The caller supplies `used_count` computed from the value it read at
    /// evaluation time; concurrent bookings on the same code can therefore
    /// under-count (lost update). That is the documented behavior, so this
    /// is deliberately not `used_count = used_count + 1` in SQL.
    async fn update_promo_usage(
        &self,
        id: PromoCodeId,
        used_count: i32,
    ) -> Result<(), StoreError>;

    /// Insert a new enquiry and return the persisted row.
    async fn insert_enquiry(&self, new: NewEnquiry) -> Result<Enquiry, StoreError>;

    /// Cheap connectivity probe for the readiness endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
