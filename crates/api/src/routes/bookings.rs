//! Booking route handlers.
//!
//! `POST /api/bookings` is the front door of the booking-creation workflow.
//! Required-field checks happen here, before any storage access, so a bad
//! payload gets its 400 without touching the database.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use brightnest_core::{BookingId, CustomerType, Email, ServiceId};

use crate::error::{AppError, Result};
use crate::models::Booking;
use crate::services::booking::{self, BookingRequest, CustomerDetails};
use crate::state::AppState;

const MISSING_FIELDS: &str =
    "Missing required fields: customer name, customer email and service_id are required";

/// Customer block of the booking payload.
#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub location: Option<String>,
}

/// Booking creation payload.
///
/// Required fields are `Option` so their absence becomes the workflow's own
/// 400 response instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateBookingPayload {
    pub customer: Option<CustomerPayload>,
    pub service_id: Option<ServiceId>,
    #[serde(default)]
    pub addon_services: Vec<ServiceId>,
    pub booking_date: Option<NaiveDate>,
    pub booking_time: Option<NaiveTime>,
    pub promo_code: Option<String>,
    pub notes: Option<String>,
}

/// Response for a successful booking.
#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking_id: BookingId,
    pub total_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

/// Create a booking.
///
/// POST /api/bookings
#[instrument(skip(state, payload), fields(service_id = ?payload.service_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<Json<CreateBookingResponse>> {
    let request = validate(payload)?;
    let confirmation = booking::create_booking(state.store(), request).await?;

    Ok(Json(CreateBookingResponse {
        success: true,
        booking_id: confirmation.booking_id,
        total_amount: confirmation.total_amount,
        discount_amount: confirmation.discount_amount,
        final_amount: confirmation.final_amount,
    }))
}

/// Fetch a booking by id.
///
/// GET /api/bookings/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<BookingId>,
) -> Result<Json<Booking>> {
    let booking = state
        .store()
        .find_booking(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_owned()))?;

    Ok(Json(booking))
}

/// Check required fields and convert the payload into a workflow request.
///
/// Emails are trimmed and lowercased before validation so lookup by email
/// stays an exact match on a canonical form.
fn validate(payload: CreateBookingPayload) -> std::result::Result<BookingRequest, AppError> {
    let Some(customer) = payload.customer else {
        return Err(AppError::Validation(MISSING_FIELDS.to_owned()));
    };

    let name = customer
        .name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty());
    let email = customer
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    let (Some(name), Some(email), Some(service_id)) = (name, email, payload.service_id) else {
        return Err(AppError::Validation(MISSING_FIELDS.to_owned()));
    };

    let email = Email::parse(&email)
        .map_err(|_| AppError::Validation("Please enter a valid email address".to_owned()))?;

    Ok(BookingRequest {
        customer: CustomerDetails {
            name,
            email,
            phone: customer.phone,
            address: customer.address,
            customer_type: customer.customer_type,
            location: customer.location,
        },
        service_id,
        addon_services: payload.addon_services,
        booking_date: payload.booking_date,
        booking_time: payload.booking_time,
        promo_code: payload.promo_code,
        notes: payload.notes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, email: Option<&str>, service_id: Option<i32>) -> CreateBookingPayload {
        CreateBookingPayload {
            customer: Some(CustomerPayload {
                name: name.map(str::to_owned),
                email: email.map(str::to_owned),
                phone: None,
                address: None,
                customer_type: None,
                location: None,
            }),
            service_id: service_id.map(ServiceId::new),
            addon_services: Vec::new(),
            booking_date: None,
            booking_time: None,
            promo_code: None,
            notes: None,
        }
    }

    #[test]
    fn test_validate_accepts_minimal_payload() {
        let request = validate(payload(Some("Astrid"), Some("a@example.com"), Some(1))).unwrap();
        assert_eq!(request.customer.name, "Astrid");
        assert_eq!(request.customer.email.as_str(), "a@example.com");
        assert_eq!(request.service_id, ServiceId::new(1));
    }

    #[test]
    fn test_validate_lowercases_email() {
        let request =
            validate(payload(Some("Astrid"), Some("  Astrid@Example.COM "), Some(1))).unwrap();
        assert_eq!(request.customer.email.as_str(), "astrid@example.com");
    }

    #[test]
    fn test_validate_rejects_missing_customer_block() {
        let mut p = payload(Some("Astrid"), Some("a@example.com"), Some(1));
        p.customer = None;
        let err = validate(p).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let err = validate(payload(Some("   "), Some("a@example.com"), Some(1))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_missing_service_id() {
        let err = validate(payload(Some("Astrid"), Some("a@example.com"), None)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_malformed_email() {
        let err = validate(payload(Some("Astrid"), Some("not-an-email"), Some(1))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
