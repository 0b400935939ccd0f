//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::bearer::BearerError;
use thiserror::Error;

use crate::domain::value_object::display_name::DisplayNameError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input, rejected before any lookup
    #[error("{0}")]
    Validation(String),

    #[error("User not found")]
    UserNotFound,

    /// No reset record carries the supplied code
    #[error("Invalid or expired reset code")]
    ResetCodeNotFound,

    /// A record was found but is used or expired
    #[error("Reset code is no longer valid")]
    ResetCodeInvalid,

    #[error("Authorization header is required")]
    MissingCredential,

    #[error("Invalid authorization header format. Use 'Bearer <token>'")]
    MalformedCredential,

    /// Bad signature, wrong algorithm, expired or unparsable token.
    /// Deliberately one message for all of them.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("A reset code was already sent. Please check your inbox or try again later")]
    ResetAlreadyPending,

    /// Freshly drawn code collides with a live record; retried by the caller
    #[error("Reset code collision")]
    ResetCodeCollision,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Hashing, signing or other unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::UserNotFound | AuthError::ResetCodeNotFound => ErrorKind::NotFound,
            AuthError::ResetCodeInvalid => ErrorKind::Gone,
            AuthError::MissingCredential
            | AuthError::MalformedCredential
            | AuthError::InvalidToken
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::EmailTaken
            | AuthError::ResetAlreadyPending
            | AuthError::ResetCodeCollision => ErrorKind::Conflict,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the logs; the rendered message is generic.
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Database(err) => AppError::from(err),
            AuthError::Internal(_) => AppError::internal("Internal server error"),
            AuthError::ResetCodeNotFound | AuthError::ResetCodeInvalid => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("Request a new reset code")
            }
            AuthError::InvalidToken => {
                AppError::new(self.kind(), self.to_string()).with_action("Please log in again")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(detail = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected bearer token");
            }
            AuthError::Forbidden => {
                tracing::warn!("Policy denied request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

/// Value objects report input problems as `BadRequest` app errors
impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<DisplayNameError> for AuthError {
    fn from(err: DisplayNameError) -> Self {
        AuthError::Validation(err.to_string())
    }
}

impl From<BearerError> for AuthError {
    fn from(err: BearerError) -> Self {
        match err {
            BearerError::Missing => AuthError::MissingCredential,
            BearerError::Malformed => AuthError::MalformedCredential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_status_codes() {
        assert_eq!(AuthError::Validation("x".into()).kind().status_code(), 400);
        assert_eq!(AuthError::ResetCodeNotFound.kind().status_code(), 404);
        assert_eq!(AuthError::ResetCodeInvalid.kind().status_code(), 410);
        assert_eq!(AuthError::MissingCredential.kind().status_code(), 401);
        assert_eq!(AuthError::InvalidToken.kind().status_code(), 401);
        assert_eq!(AuthError::Forbidden.kind().status_code(), 403);
        assert_eq!(AuthError::EmailTaken.kind().status_code(), 409);
        assert_eq!(AuthError::ResetAlreadyPending.kind().status_code(), 409);
        assert_eq!(
            AuthError::Internal("boom".into()).kind().status_code(),
            500
        );
    }

    #[test]
    fn test_internal_details_not_rendered() {
        let err = AuthError::Internal("argon2 exploded".into()).into_app_error();
        assert_eq!(err.message(), "Internal server error");

        let err = AuthError::Database(sqlx::Error::PoolTimedOut).into_app_error();
        assert!(!err.message().contains("timed out"));
    }

    #[test]
    fn test_storage_errors_keep_their_status() {
        let resp = AuthError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(resp.status(), 503);

        let resp = AuthError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), 404);

        let resp = AuthError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(resp.status(), 500);
    }

    #[test]
    fn test_bad_request_app_error_becomes_validation() {
        let err: AuthError = AppError::bad_request("Invalid email format").into();
        assert!(matches!(err, AuthError::Validation(ref m) if m == "Invalid email format"));

        let err: AuthError = AppError::internal("nope").into();
        assert!(matches!(err, AuthError::Internal(_)));
    }

    #[test]
    fn test_bearer_errors_map_to_distinct_variants() {
        assert!(matches!(
            AuthError::from(BearerError::Missing),
            AuthError::MissingCredential
        ));
        assert!(matches!(
            AuthError::from(BearerError::Malformed),
            AuthError::MalformedCredential
        ));
    }
}
