//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, AppError>`; the
//! response body is JSON `{"error": "..."}` with a status code derived from
//! the domain error, so callers never have to parse message strings.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use sugarloaf_commerce::CommerceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Commerce core operation failed.
    #[error("{0}")]
    Commerce(#[from] CommerceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Commerce(err) => match err {
                CommerceError::Store(_) | CommerceError::Corrupt { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                CommerceError::NotFound { .. } => StatusCode::NOT_FOUND,
                CommerceError::InvalidTransition { .. }
                | CommerceError::InsufficientStock { .. }
                | CommerceError::DuplicateVariant { .. } => StatusCode::CONFLICT,
                CommerceError::EmptyOrder
                | CommerceError::UnknownOption { .. }
                | CommerceError::VariantTracked(_)
                | CommerceError::Validation { .. } => StatusCode::BAD_REQUEST,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry; client errors are expected noise.
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sugarloaf_core::OrderStatus;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        assert_eq!(
            AppError::from(CommerceError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(CommerceError::InsufficientStock {
                key: "p1-red-M".to_string(),
                requested: 3,
                available: 2,
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(CommerceError::EmptyOrder).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("order".to_string()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
