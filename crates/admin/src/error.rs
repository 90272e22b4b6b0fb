//! Unified error handling for the admin API.
//!
//! Same shape as the storefront's: JSON `{"error": "..."}` bodies with
//! status codes derived from the domain error, server errors captured to
//! Sentry with details hidden from the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use sugarloaf_commerce::CommerceError;

/// Application-level error type for the admin API.
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

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
