//! Bearer Credential Extraction
//!
//! Pulls the token out of an `Authorization: Bearer <token>` header.
//! Token verification is left to the caller.

use http::{HeaderMap, header::AUTHORIZATION};
use thiserror::Error;

pub const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Authorization header is required")]
    Missing,

    #[error("Invalid authorization header format. Use 'Bearer <token>'")]
    Malformed,
}

/// Extract the bearer token from request headers
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers.get(AUTHORIZATION).ok_or(BearerError::Missing)?;
    // Non-visible-ASCII header bytes cannot form a token
    let value = value.to_str().map_err(|_| BearerError::Malformed)?;
    parse_bearer(value)
}

/// Parse a raw `Authorization` header value
pub fn parse_bearer(value: &str) -> Result<&str, BearerError> {
    if value.trim().is_empty() {
        return Err(BearerError::Missing);
    }

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::Malformed)?
        .trim();

    if token.is_empty() {
        return Err(BearerError::Malformed);
    }

    Ok(token)
}
