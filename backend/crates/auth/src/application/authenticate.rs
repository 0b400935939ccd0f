//! Authentication Gate
//!
//! Turns an `Authorization` header into a resolved caller identity.
//! The HTTP middleware is a thin wrapper around [`authenticate`].

use http::HeaderMap;
use kernel::id::UserId;
use platform::bearer::extract_bearer;

use crate::application::token::{SessionClaims, SessionTokenService};
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Identity of the caller, published into request context by the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub email: Email,
    pub name: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn from_claims(claims: SessionClaims) -> AuthResult<Self> {
        Ok(Self {
            user_id: claims.user_id()?,
            email: Email::from_db(claims.email),
            name: claims.name,
            role: claims.role,
        })
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Extract and verify the bearer token
///
/// - no header: `MissingCredential`
/// - not `Bearer <token>`: `MalformedCredential`
/// - anything wrong with the token itself: `InvalidToken`
pub fn authenticate(headers: &HeaderMap, tokens: &SessionTokenService) -> AuthResult<CurrentUser> {
    let token = extract_bearer(headers).map_err(AuthError::from)?;
    let claims = tokens.validate(token)?;
    CurrentUser::from_claims(claims)
}
