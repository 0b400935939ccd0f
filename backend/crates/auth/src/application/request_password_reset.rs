//! Request Password Reset Use Case
//!
//! Issues a single-use reset code and hands it to the notifier.
//!
//! The public response is the same for every outcome so callers cannot
//! learn whether an email is registered or a reset is already in flight.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{password_reset::PasswordReset, user::User};
use crate::domain::notifier::{PasswordResetNotifier, ResetNotice};
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// The only message a reset request ever answers with
pub const RESET_REQUEST_MESSAGE: &str = "If the email is registered, a reset code has been sent. \
     If you already requested one, please check your inbox or try again later.";

/// Fresh codes drawn before giving up on collisions with live records
const MAX_CODE_ATTEMPTS: usize = 5;

/// What actually happened, for in-process callers only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetRequestOutcome {
    Issued,
    AlreadyPending,
    UnknownEmail,
}

#[derive(Debug)]
pub struct RequestPasswordResetOutput {
    pub outcome: ResetRequestOutcome,
    pub message: &'static str,
}

impl From<ResetRequestOutcome> for RequestPasswordResetOutput {
    fn from(outcome: ResetRequestOutcome) -> Self {
        Self {
            outcome,
            message: RESET_REQUEST_MESSAGE,
        }
    }
}

pub struct RequestPasswordResetUseCase<U, R, N>
where
    U: UserRepository,
    R: PasswordResetRepository,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    reset_repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<U, R, N> RequestPasswordResetUseCase<U, R, N>
where
    U: UserRepository,
    R: PasswordResetRepository,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        reset_repo: Arc<R>,
        notifier: Arc<N>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            reset_repo,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, email: String) -> AuthResult<RequestPasswordResetOutput> {
        let email = Email::new(email)?;

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(ResetRequestOutcome::UnknownEmail.into());
        };

        // Fast path; the one-valid-record-per-identity index is the source of truth
        if self
            .reset_repo
            .find_valid_by_user_id(&user.user_id)
            .await?
            .is_some()
        {
            tracing::info!(user_id = %user.user_id, "Password reset already pending");
            return Ok(ResetRequestOutcome::AlreadyPending.into());
        }

        let Some(reset) = self.create_record(&user).await? else {
            tracing::info!(user_id = %user.user_id, "Password reset already pending");
            return Ok(ResetRequestOutcome::AlreadyPending.into());
        };

        tracing::info!(
            user_id = %user.user_id,
            reset_id = %reset.reset_id,
            expires_at = %reset.expires_at,
            "Password reset code issued"
        );

        self.dispatch_notice(&user, &reset);

        Ok(ResetRequestOutcome::Issued.into())
    }

    /// Persist a new record, redrawing the code on collisions.
    /// `None` when a concurrent request won the race for this identity.
    async fn create_record(&self, user: &User) -> AuthResult<Option<PasswordReset>> {
        let mut reset = PasswordReset::new(
            user.user_id,
            user.email.clone(),
            self.config.reset_code_ttl(),
        );

        for attempt in 1..=MAX_CODE_ATTEMPTS {
            match self.reset_repo.create(&reset).await {
                Ok(()) => return Ok(Some(reset)),
                Err(AuthError::ResetAlreadyPending) => return Ok(None),
                Err(AuthError::ResetCodeCollision) => {
                    tracing::debug!(attempt, "Reset code collision, drawing a new code");
                    reset.regenerate_code();
                }
                Err(e) => return Err(e),
            }
        }

        Err(AuthError::Internal(format!(
            "No free reset code after {MAX_CODE_ATTEMPTS} attempts"
        )))
    }

    /// Best-effort delivery off the request path. Failures are logged only;
    /// the record stays valid either way.
    fn dispatch_notice(&self, user: &User, reset: &PasswordReset) {
        let notice = ResetNotice {
            to: reset.email.clone(),
            name: user.name.clone(),
            code: reset.code.clone(),
            expires_in_minutes: reset.ttl_minutes(),
        };
        let notifier = self.notifier.clone();
        let user_id = user.user_id;
        let reset_id = reset.reset_id;

        tokio::spawn(async move {
            match notifier.send_password_reset_notice(&notice).await {
                Ok(()) => tracing::debug!(%user_id, %reset_id, "Password reset notice sent"),
                Err(e) => tracing::warn!(
                    %user_id,
                    %reset_id,
                    error = %e,
                    "Failed to send password reset notice"
                ),
            }
        });
    }
}
