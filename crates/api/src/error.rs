//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures infrastructure errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always `{ "error": ... }`.
//!
//! The variants mirror the workflow's error taxonomy: validation failures
//! and bad references are client errors reported before (or instead of) any
//! write; infrastructure failures are server errors whose client-facing
//! message is fixed per failing step, never the underlying storage detail.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::booking::BookingError;
use crate::store::StoreError;

/// Application-level error type for the booking API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request payload is missing or malformed required input.
    #[error("{0}")]
    Validation(String),

    /// A referenced entity does not resolve (e.g., unknown service id).
    #[error("{0}")]
    InvalidReference(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// A storage operation failed. `message` is what the client sees.
    #[error("{message}")]
    Infrastructure {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

/// JSON error body returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if let Self::Infrastructure { ref source, .. } = self {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                source = %source,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) | Self::InvalidReference(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Infrastructure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients; Infrastructure
        // already carries its fixed client-facing message.
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::InvalidService => {
                Self::InvalidReference("Invalid service ID".to_owned())
            }
            BookingError::Customer(source) => Self::Infrastructure {
                message: "Failed to create customer",
                source,
            },
            BookingError::Write(source) => Self::Infrastructure {
                message: "Failed to create booking",
                source,
            },
            BookingError::Store(source) => Self::Infrastructure {
                message: "Internal server error",
                source,
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(source: StoreError) -> Self {
        Self::Infrastructure {
            message: "Internal server error",
            source,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
