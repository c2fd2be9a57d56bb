//! Booking rows.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use brightnest_core::{BookingId, BookingStatus, CustomerId, PromoCodeId, ServiceId};

/// A booking as persisted.
///
/// `final_amount` is always `total_amount - discount_amount`. A flat promo
/// discount larger than the order total yields a negative final amount; that
/// is stored as-is.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: BookingId,
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    /// Add-on service ids in the order the customer picked them.
    pub addon_services: Vec<ServiceId>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
    /// Pre-discount sum of the primary service and resolved add-ons.
    pub total_amount: Decimal,
    pub promo_code_id: Option<PromoCodeId>,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_id: CustomerId,
    pub service_id: ServiceId,
    pub addon_services: Vec<ServiceId>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
    pub total_amount: Decimal,
    pub promo_code_id: Option<PromoCodeId>,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
    pub notes: Option<String>,
    pub status: BookingStatus,
}
