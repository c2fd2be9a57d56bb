//! Promo code rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use brightnest_core::{DiscountType, PromoCodeId};

/// A discount code.
///
/// Codes are stored uppercase and matched after uppercasing the input, so
/// lookup is effectively case-insensitive. `used_count` is a monotonic
/// counter incremented once per booking that applies the code.
#[derive(Debug, Clone, FromRow)]
pub struct PromoCode {
    pub id: PromoCodeId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    /// Cap on the computed discount. Only consulted for percentage codes.
    pub max_discount_amount: Option<Decimal>,
    pub is_active: bool,
    pub used_count: i32,
    pub created_at: DateTime<Utc>,
}
