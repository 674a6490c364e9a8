//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// The bearer token from the `Authorization` header.
///
/// Infallible: a missing or non-bearer header yields an empty token, which
/// fails verification downstream and surfaces as the unauthenticated denial —
/// not as a malformed-request 400. Auth failures all look the same to clients.
#[derive(Debug, Clone)]
pub struct Bearer(pub String);

impl Bearer {
    /// The raw token (possibly empty).
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .unwrap_or_default();
        Ok(Bearer(token.to_string()))
    }
}
