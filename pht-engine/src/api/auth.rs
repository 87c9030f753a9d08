//! Caller role extraction
//!
//! The upstream identity layer is out of scope; handlers consume only the
//! resolved role. Tokens arrive in the `x-api-token` header. With no tokens
//! configured, every caller resolves to admin (local development).

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use pht_common::auth::Role;

use crate::error::ApiError;
use crate::AppState;

/// Request header carrying the API token
pub const API_TOKEN_HEADER: &str = "x-api-token";

/// The resolved caller of the current request
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub role: Role,
}

impl Caller {
    /// Reject anonymous callers
    pub fn require_user(&self) -> Result<(), ApiError> {
        if self.role.is_user() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized(
                "authentication required".to_string(),
            ))
        }
    }

    /// Reject everything below admin
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized("admin role required".to_string()))
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        Ok(Caller {
            role: state.tokens.resolve(presented),
        })
    }
}
