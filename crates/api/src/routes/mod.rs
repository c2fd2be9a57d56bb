//! HTTP route handlers for the booking API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Liveness check
//! GET  /health/ready        - Readiness check (probes the store)
//!
//! # Bookings
//! POST /api/bookings        - Create a booking (the core workflow)
//! GET  /api/bookings/{id}   - Fetch a booking
//!
//! # Catalog
//! GET  /api/services        - Active services and add-ons
//!
//! # Promo codes
//! POST /api/promo/validate  - Strict promo validation for the booking form
//!
//! # Enquiries
//! POST /api/enquiries       - Submit a contact-form enquiry
//! ```
//!
//! Every route carries permissive CORS headers; `OPTIONS` preflights get an
//! empty 200. All bodies are JSON.

pub mod bookings;
pub mod catalog;
pub mod enquiries;
pub mod promo;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the `/api` routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(bookings::create))
        .route("/bookings/{id}", get(bookings::show))
        .route("/services", get(catalog::index))
        .route("/promo/validate", post(promo::validate))
        .route("/enquiries", post(enquiries::create))
}

/// Build the full application router for the given state.
///
/// Shared between `main` and the router tests, which run it against the
/// in-memory store via `tower::ServiceExt::oneshot`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        // The marketing front-end is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
