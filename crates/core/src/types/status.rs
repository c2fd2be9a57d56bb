//! Domain enums for customers, promo codes, and bookings.

use serde::{Deserialize, Serialize};

/// Customer segment.
///
/// Requests that omit the segment default to `Individual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "booking.customer_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    #[default]
    Individual,
    Corporate,
    HolidayHome,
}

/// How a promo code discounts an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "booking.discount_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage of the order total, optionally capped.
    Percentage,
    /// Flat amount, not clamped against the order total.
    Fixed,
}

/// Booking lifecycle status.
///
/// The creation workflow only ever writes `Pending`; later transitions are
/// driven by staff tooling outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "booking.booking_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}
