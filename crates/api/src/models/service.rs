//! Catalog service rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use brightnest_core::ServiceId;

/// A bookable service: either a primary service or an add-on priced
/// alongside one.
///
/// Read-only from the booking workflow's perspective; rows are written by
/// `bn-cli seed` and staff tooling.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub is_addon: bool,
    pub is_active: bool,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}
