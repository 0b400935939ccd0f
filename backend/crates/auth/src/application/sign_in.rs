//! Sign In Use Case
//!
//! Verifies a credential and issues a session token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::token::SessionTokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub token: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: User,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<SessionTokenService>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(
        user_repo: Arc<U>,
        tokens: Arc<SessionTokenService>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(input.email)?;
        if input.password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        // Unknown email and wrong password are indistinguishable to the caller
        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Policy is not re-applied here: a non-conforming password just fails to verify
        let raw_password = RawPassword::for_verification(input.password);
        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        if user.password_hash.needs_rehash() {
            self.rehash(&mut user, &raw_password).await;
        }

        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.user_id, role = %user.user_role, "User signed in");

        Ok(SignInOutput {
            token,
            expires_in: self.tokens.ttl_secs(),
            user,
        })
    }

    /// Upgrade a digest made with outdated parameters. Failure is not fatal to sign-in.
    async fn rehash(&self, user: &mut User, raw_password: &RawPassword) {
        match UserPassword::from_raw(raw_password, self.config.pepper()) {
            Ok(hash) => {
                user.set_password(hash);
                match self.user_repo.update(user).await {
                    Ok(true) => tracing::info!(user_id = %user.user_id, "Password hash upgraded"),
                    Ok(false) => {
                        tracing::warn!(user_id = %user.user_id, "Identity vanished before rehash")
                    }
                    Err(e) => {
                        tracing::warn!(user_id = %user.user_id, error = %e, "Failed to store upgraded password hash")
                    }
                }
            }
            Err(e) => {
                tracing::warn!(user_id = %user.user_id, error = %e, "Failed to rehash password");
            }
        }
    }
}
