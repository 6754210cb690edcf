use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pharma_core::{CoreError, Requester};

use crate::error::AppError;

pub const CALLER_HEADER: &str = "x-caller-id";

/// The resolved identity behind a request, taken from `x-caller-id`.
#[derive(Debug, Clone)]
pub struct Caller(pub Requester);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CoreError::Authorization(format!("missing {} header", CALLER_HEADER)))?;

        Ok(Caller(Requester::resolve(raw)?))
    }
}
