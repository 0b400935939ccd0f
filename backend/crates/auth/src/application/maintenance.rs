//! Maintenance Use Cases
//!
//! Out-of-band jobs run by the server process: expired reset record
//! cleanup and the bootstrap admin account.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Reset record sweep
// ============================================================================

pub struct SweepExpiredResetsUseCase<R>
where
    R: PasswordResetRepository,
{
    reset_repo: Arc<R>,
}

impl<R> SweepExpiredResetsUseCase<R>
where
    R: PasswordResetRepository + Send + Sync + 'static,
{
    pub fn new(reset_repo: Arc<R>) -> Self {
        Self { reset_repo }
    }

    pub async fn execute(&self) -> AuthResult<u64> {
        let deleted = self.reset_repo.delete_expired().await?;
        tracing::info!(deleted, "Expired password resets swept");
        Ok(deleted)
    }

    /// Run the sweep every `period` in a background task
    ///
    /// Failures are logged and the loop keeps going.
    pub fn spawn_periodic(self, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // First tick completes immediately; startup already swept
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = self.execute().await {
                    tracing::warn!(error = %e, "Password reset sweep failed");
                }
            }
        })
    }
}

// ============================================================================
// Admin seed
// ============================================================================

pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyExists,
}

pub struct SeedAdminUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SeedAdminUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Create the admin identity unless the email is already registered
    pub async fn execute(&self, seed: AdminSeed) -> AuthResult<SeedOutcome> {
        let email = Email::new(seed.email)?;
        let name = DisplayName::new(&seed.name)?;
        let raw_password = RawPassword::new(seed.password)?;

        if self.user_repo.exists_by_email(&email).await? {
            tracing::info!("Admin account already present");
            return Ok(SeedOutcome::AlreadyExists);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let admin = User::with_role(name, email, password_hash, UserRole::Admin);

        match self.user_repo.create(&admin).await {
            Ok(()) => {
                tracing::info!(user_id = %admin.user_id, "Admin account created");
                Ok(SeedOutcome::Created)
            }
            // Another instance seeded first
            Err(AuthError::EmailTaken) => Ok(SeedOutcome::AlreadyExists),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::password_reset::PasswordReset;
    use crate::domain::value_object::user_filter::UserFilter;
    use crate::infra::memory::InMemoryAuthRepository;
    use kernel::id::UserId;

    fn config() -> Arc<AuthConfig> {
        Arc::new(AuthConfig::new(
            b"test-secret-key-with-at-least-32-bytes!".to_vec(),
        ))
    }

    fn seed() -> AdminSeed {
        AdminSeed {
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
            name: "Administrator".to_string(),
        }
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let uc = SeedAdminUseCase::new(repo.clone(), config());

        assert_eq!(uc.execute(seed()).await.unwrap(), SeedOutcome::Created);
        assert_eq!(uc.execute(seed()).await.unwrap(), SeedOutcome::AlreadyExists);

        let admin = repo
            .find_by_email(&Email::new("admin@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.user_role, UserRole::Admin);
        assert_eq!(repo.find_filtered(&UserFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let repo = Arc::new(InMemoryAuthRepository::new());
        let expired_owner = UserId::new();
        let live_owner = UserId::new();
        let email = Email::new("jane@x.com").unwrap();

        let expired = PasswordReset::new(expired_owner, email.clone(), chrono::Duration::minutes(15));
        let live = PasswordReset::new(live_owner, email, chrono::Duration::minutes(15));
        PasswordResetRepository::create(&*repo, &expired).await.unwrap();
        PasswordResetRepository::create(&*repo, &live).await.unwrap();
        repo.expire_resets_for(&expired_owner).await;

        let deleted = SweepExpiredResetsUseCase::new(repo.clone())
            .execute()
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        assert_eq!(repo.reset_count().await, 1);
        assert!(repo.find_valid_by_user_id(&live_owner).await.unwrap().is_some());
    }
}
