//! Customer rows.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use brightnest_core::{CustomerId, CustomerType, Email};

/// A customer, keyed for lookup by their unique email address.
///
/// Rows are created on a customer's first booking or enquiry and are never
/// updated or deleted by this service, even when a later request carries
/// different contact details for the same email.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
    pub location: Option<String>,
}
