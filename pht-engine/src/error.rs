//! Error types for pht-engine
//!
//! Maps the shared error taxonomy onto HTTP responses. Ties are never
//! errors; they travel inside 200 bodies as distinguished results.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// API-facing error with an HTTP status mapping
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input; rejected before any write
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Caller lacks the required role; rejected before any read
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced player, session, team or match absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request conflicts with a structural invariant of stored state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store or internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<pht_common::Error> for ApiError {
    fn from(err: pht_common::Error) -> Self {
        use pht_common::Error;
        match err {
            Error::InvalidInput(msg) => ApiError::Validation(msg),
            Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {}", self);
        }
        let body = Json(json!({
            "error": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Convenience result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;
