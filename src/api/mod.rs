//! API handlers for LendHub REST endpoints

pub mod bookings;
pub mod health;
pub mod items;
pub mod openapi;
pub mod requests;
pub mod users;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Header carrying the caller's user id
pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

/// Extractor for the caller identity passed in the X-Sharer-User-Id header
pub struct SharerId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for SharerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SHARER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing {} header", SHARER_HEADER))
            })?;

        let id = value
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest(format!("Invalid {} header", SHARER_HEADER)))?;

        Ok(SharerId(id))
    }
}

/// Run derive-based validation on a request body, folding all field
/// messages into one 400 response.
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate().map_err(|errors| {
        let mut messages: Vec<String> = Vec::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                match &err.message {
                    Some(message) => messages.push(format!("{}: {}", field, message)),
                    None => messages.push(format!("{}: invalid value", field)),
                }
            }
        }
        messages.sort();
        AppError::Validation(messages.join("; "))
    })
}
