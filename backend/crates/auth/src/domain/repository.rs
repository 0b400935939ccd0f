//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Absence is `Ok(None)` / `Ok(false)`, never an error.

use kernel::id::UserId;

use crate::domain::entity::{password_reset::PasswordReset, user::User};
use crate::domain::value_object::{email::Email, reset_code::ResetCode, user_filter::UserFilter};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// Fails with `EmailTaken` when the email key is already registered.
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Persist name, email and credential changes
    ///
    /// Returns `false` when no stored identity matched. Fails with
    /// `EmailTaken` when the new email belongs to someone else.
    async fn update(&self, user: &User) -> AuthResult<bool>;

    /// Returns whether a row was removed
    async fn delete(&self, user_id: &UserId) -> AuthResult<bool>;

    /// One page of identities matching `filter`, in its order
    async fn find_filtered(&self, filter: &UserFilter) -> AuthResult<Vec<User>>;
}

/// Password reset record repository trait
#[trait_variant::make(PasswordResetRepository: Send)]
pub trait LocalPasswordResetRepository {
    /// Persist a new record
    ///
    /// Fails with `ResetAlreadyPending` when the identity already has a valid
    /// record, and with `ResetCodeCollision` when the code is taken by one.
    async fn create(&self, reset: &PasswordReset) -> AuthResult<()>;

    /// Latest record carrying `code`, whatever its state
    async fn find_by_code(&self, code: &ResetCode) -> AuthResult<Option<PasswordReset>>;

    /// The identity's unused, unexpired record, if any
    async fn find_valid_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<PasswordReset>>;

    /// Persist the `used` flag
    ///
    /// Returns `false` when the stored record was already used, so a code
    /// can be consumed at most once even under concurrent confirmations.
    async fn update(&self, reset: &PasswordReset) -> AuthResult<bool>;

    /// Remove expired records; returns how many
    async fn delete_expired(&self) -> AuthResult<u64>;
}
