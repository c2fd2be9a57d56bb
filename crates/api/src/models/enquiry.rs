//! Enquiry rows.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use brightnest_core::{CustomerId, EnquiryId, ServiceId};

/// A free-form enquiry from the contact form, optionally about a specific
/// service. The sender is resolved to a customer row first, the same way a
/// booking resolves its customer.
#[derive(Debug, Clone, FromRow)]
pub struct Enquiry {
    pub id: EnquiryId,
    pub customer_id: CustomerId,
    pub service_id: Option<ServiceId>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new enquiry.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub customer_id: CustomerId,
    pub service_id: Option<ServiceId>,
    pub message: String,
}
