//! Auth Middleware
//!
//! Bearer-token gate for protected routes, plus the extractor handlers use
//! to read the identity it resolved.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::authenticate::{CurrentUser, authenticate};
use crate::application::token::SessionTokenService;
use crate::error::AuthError;

/// Middleware that requires a valid bearer token
///
/// On success the caller's `CurrentUser` is stored in request extensions.
pub async fn require_bearer_auth(
    State(tokens): State<Arc<SessionTokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let current = authenticate(req.headers(), &tokens)?;

    tracing::debug!(user_id = %current.user_id, "Bearer token accepted");

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent only when a route skipped the gate
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingCredential)
    }
}
