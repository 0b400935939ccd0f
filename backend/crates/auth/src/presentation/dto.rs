//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{CurrentUser, SignUpOutput};
use crate::domain::entity::user::User;
use crate::domain::value_object::{user_filter::UserFilterParams, user_role::UserRole};

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub token: String,
    /// Always `Bearer`
    pub token_type: &'static str,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserResponse,
}

// ============================================================================
// Password Reset
// ============================================================================

/// Password reset request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Password reset confirmation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirmRequest {
    pub code: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ============================================================================
// Users
// ============================================================================

/// `GET /api/v1/users` query string
///
/// Unparsable `page`/`limit` values fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl From<ListUsersQuery> for UserFilterParams {
    fn from(query: ListUsersQuery) -> Self {
        let number = |v: Option<String>| v.and_then(|v| v.trim().parse::<u32>().ok());
        Self {
            name: query.name,
            email: query.email,
            role: query.role,
            sort_by: query.sort_by,
            sort_order: query.sort_order,
            page: number(query.page),
            limit: number(query.limit),
        }
    }
}

/// Public view of an identity; the credential is never serialized
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id.to_string(),
            name: user.name.into_inner(),
            email: user.email.into_db(),
            role: user.user_role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<SignUpOutput> for SignUpResponse {
    fn from(output: SignUpOutput) -> Self {
        Self {
            id: output.user_id.to_string(),
            name: output.name.into_inner(),
            email: output.email.into_db(),
            role: output.role,
            created_at: output.created_at,
        }
    }
}

/// Update request; absent fields are left unchanged
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Caller identity as seen by the authentication gate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl From<CurrentUser> for ProfileResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.user_id.to_string(),
            email: user.email.into_db(),
            name: user.name,
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
