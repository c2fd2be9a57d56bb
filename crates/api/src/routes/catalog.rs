//! Service catalog route handlers.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::models::Service;
use crate::state::AppState;

/// List active services, primary services before add-ons.
///
/// GET /api/services
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Service>>> {
    let services = state.store().list_active_services().await?;
    Ok(Json(services))
}
