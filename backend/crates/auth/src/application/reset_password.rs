//! Reset Password Use Case
//!
//! Consumes a reset code and replaces the identity's credential.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::domain::value_object::{
    reset_code::ResetCode,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub struct ResetPasswordInput {
    pub code: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<U, R>
where
    U: UserRepository,
    R: PasswordResetRepository,
{
    user_repo: Arc<U>,
    reset_repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<U, R> ResetPasswordUseCase<U, R>
where
    U: UserRepository,
    R: PasswordResetRepository,
{
    pub fn new(user_repo: Arc<U>, reset_repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            reset_repo,
            config,
        }
    }

    pub async fn execute(&self, input: ResetPasswordInput) -> AuthResult<()> {
        // Shape checks come before any lookup
        let code = ResetCode::parse(&input.code)?;
        let raw_password = RawPassword::new(input.new_password)?;

        let mut reset = self
            .reset_repo
            .find_by_code(&code)
            .await?
            .ok_or(AuthError::ResetCodeNotFound)?;

        let mut user = self
            .user_repo
            .find_by_id(&reset.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // The lookup does not filter by state, so used/expired records land here
        if !reset.validate_code(&code) {
            tracing::info!(
                reset_id = %reset.reset_id,
                used = reset.used,
                expired = reset.is_expired(),
                "Rejected reset code"
            );
            return Err(AuthError::ResetCodeInvalid);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Consume first: a concurrent confirmation of the same code loses here
        reset.mark_used();
        if !self.reset_repo.update(&reset).await? {
            return Err(AuthError::ResetCodeInvalid);
        }

        user.set_password(password_hash);
        if !self.user_repo.update(&user).await? {
            tracing::warn!(
                user_id = %user.user_id,
                reset_id = %reset.reset_id,
                "Identity vanished before its password could be replaced"
            );
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(
            user_id = %user.user_id,
            reset_id = %reset.reset_id,
            "Password reset completed"
        );

        Ok(())
    }
}
