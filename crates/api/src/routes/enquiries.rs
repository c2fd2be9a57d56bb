//! Enquiry route handlers.
//!
//! Contact-form submissions resolve the sender to a customer row with the
//! same find-or-create used by bookings, then record the enquiry itself.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use brightnest_core::{Email, EnquiryId, ServiceId};

use crate::error::{AppError, Result};
use crate::models::NewEnquiry;
use crate::services::booking::{CustomerDetails, resolve_customer};
use crate::state::AppState;

const MISSING_FIELDS: &str = "Missing required fields: name, email and message are required";

/// Enquiry submission payload.
#[derive(Debug, Deserialize)]
pub struct CreateEnquiryPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service_id: Option<ServiceId>,
    pub message: Option<String>,
}

/// Response for a recorded enquiry.
#[derive(Debug, Serialize)]
pub struct CreateEnquiryResponse {
    pub success: bool,
    pub enquiry_id: EnquiryId,
}

/// Submit an enquiry.
///
/// POST /api/enquiries
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateEnquiryPayload>,
) -> Result<Json<CreateEnquiryResponse>> {
    let name = payload
        .name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty());
    let email = payload
        .email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());
    let message = payload
        .message
        .map(|m| m.trim().to_owned())
        .filter(|m| !m.is_empty());

    let (Some(name), Some(email), Some(message)) = (name, email, message) else {
        return Err(AppError::Validation(MISSING_FIELDS.to_owned()));
    };

    let email = Email::parse(&email)
        .map_err(|_| AppError::Validation("Please enter a valid email address".to_owned()))?;

    let customer_id = resolve_customer(
        state.store(),
        CustomerDetails {
            name,
            email,
            phone: payload.phone,
            address: None,
            customer_type: None,
            location: None,
        },
    )
    .await
    .map_err(|source| AppError::Infrastructure {
        message: "Failed to create customer",
        source,
    })?;

    let enquiry = state
        .store()
        .insert_enquiry(NewEnquiry {
            customer_id,
            service_id: payload.service_id,
            message,
        })
        .await
        .map_err(|source| AppError::Infrastructure {
            message: "Failed to submit enquiry",
            source,
        })?;

    tracing::info!(enquiry_id = %enquiry.id, "Enquiry recorded");

    Ok(Json(CreateEnquiryResponse {
        success: true,
        enquiry_id: enquiry.id,
    }))
}
