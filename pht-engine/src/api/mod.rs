//! HTTP API handlers

pub mod auth;
pub mod health;
pub mod players;
pub mod round1;
pub mod round2;
pub mod round3;
pub mod sessions;

pub use auth::Caller;

use crate::error::ApiError;

/// Reject blank or whitespace-only identifier fields before they reach the
/// store
pub(crate) fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, ApiError> {
    if value.trim().is_empty() {
        Err(ApiError::Validation(format!("{} is required", field)))
    } else {
        Ok(value)
    }
}

/// Money totals are whole non-negative dollars
pub(crate) fn valid_money(money: i64) -> Result<i64, ApiError> {
    if money < 0 {
        Err(ApiError::Validation(
            "money must be a non-negative total".to_string(),
        ))
    } else {
        Ok(money)
    }
}
