//! Promo code validation route handlers.
//!
//! This is the strict half of the promo-code semantics: the booking form
//! calls it to tell the customer whether a code is good, and an unknown or
//! inactive code is reported as an error. The booking workflow itself stays
//! lenient and silently skips bad codes at checkout.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use brightnest_core::{DiscountType, PromoCodeId};

use crate::error::{AppError, Result};
use crate::services::booking::compute_discount;
use crate::state::AppState;

/// Promo validation payload.
#[derive(Debug, Deserialize)]
pub struct ValidatePromoPayload {
    pub code: Option<String>,
    /// Order total the discount is computed against.
    pub amount: Option<Decimal>,
}

/// Response for a valid promo code.
#[derive(Debug, Serialize)]
pub struct ValidatePromoResponse {
    pub valid: bool,
    pub promo_code_id: PromoCodeId,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

/// Validate a promo code against an order total.
///
/// POST /api/promo/validate
#[instrument(skip(state, payload))]
pub async fn validate(
    State(state): State<AppState>,
    Json(payload): Json<ValidatePromoPayload>,
) -> Result<Json<ValidatePromoResponse>> {
    let code = payload
        .code
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty());
    let (Some(code), Some(amount)) = (code, payload.amount) else {
        return Err(AppError::Validation(
            "Missing required fields: code and amount are required".to_owned(),
        ));
    };

    let promo = state
        .store()
        .find_active_promo(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Invalid or inactive promo code".to_owned()))?;

    let discount_amount = compute_discount(&promo, amount);

    Ok(Json(ValidatePromoResponse {
        valid: true,
        promo_code_id: promo.id,
        code: promo.code,
        discount_type: promo.discount_type,
        discount_value: promo.discount_value,
        discount_amount,
        final_amount: amount - discount_amount,
    }))
}
