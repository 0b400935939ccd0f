//! In-Memory Repository
//!
//! Process-local store with the same uniqueness rules as the PostgreSQL
//! schema. Used by tests and local development without a database.

use chrono::Utc;
use kernel::id::UserId;
use tokio::sync::RwLock;

use crate::domain::entity::{password_reset::PasswordReset, user::User};
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::domain::value_object::{
    email::Email,
    reset_code::ResetCode,
    user_filter::{SortField, SortOrder, UserFilter},
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    resets: Vec<PasswordReset>,
}

#[derive(Default)]
pub struct InMemoryAuthRepository {
    tables: RwLock<Tables>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.user_id == *user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == *email).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|u| u.email == *email))
    }

    async fn update(&self, user: &User) -> AuthResult<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.email == user.email && u.user_id != user.user_id)
        {
            return Err(AuthError::EmailTaken);
        }
        match tables.users.iter_mut().find(|u| u.user_id == user.user_id) {
            Some(stored) => {
                stored.name = user.name.clone();
                stored.email = user.email.clone();
                stored.password_hash = user.password_hash.clone();
                stored.updated_at = user.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.user_id != *user_id);
        let removed = tables.users.len() < before;
        if removed {
            // ON DELETE CASCADE
            tables.resets.retain(|r| r.user_id != *user_id);
        }
        Ok(removed)
    }

    async fn find_filtered(&self, filter: &UserFilter) -> AuthResult<Vec<User>> {
        let tables = self.tables.read().await;
        let name = filter.name().map(str::to_lowercase);
        let email = filter.email().map(str::to_lowercase);

        let mut users: Vec<User> = tables
            .users
            .iter()
            .filter(|u| {
                name.as_deref()
                    .is_none_or(|n| u.name.as_str().to_lowercase().contains(n))
            })
            .filter(|u| {
                email
                    .as_deref()
                    .is_none_or(|e| u.email.as_str().contains(e))
            })
            .filter(|u| filter.role().is_none_or(|r| u.user_role == r))
            .cloned()
            .collect();

        users.sort_by(|a, b| {
            let ordering = match filter.sort_by() {
                SortField::Name => a.name.as_str().cmp(b.name.as_str()),
                SortField::Email => a.email.as_str().cmp(b.email.as_str()),
                SortField::Role => a.user_role.code().cmp(b.user_role.code()),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            let ordering = match filter.sort_order() {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            };
            ordering.then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });

        Ok(users
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect())
    }
}

impl PasswordResetRepository for InMemoryAuthRepository {
    async fn create(&self, reset: &PasswordReset) -> AuthResult<()> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;

        // Mirrors the expired-leftover cleanup of the SQL store
        tables.resets.retain(|r| {
            r.used
                || r.is_valid_at(now)
                || (r.user_id != reset.user_id && !r.code.matches(&reset.code))
        });

        for open in tables.resets.iter().filter(|r| r.is_valid_at(now)) {
            if open.user_id == reset.user_id {
                return Err(AuthError::ResetAlreadyPending);
            }
            if open.code.matches(&reset.code) {
                return Err(AuthError::ResetCodeCollision);
            }
        }

        tables.resets.push(reset.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &ResetCode) -> AuthResult<Option<PasswordReset>> {
        let tables = self.tables.read().await;
        Ok(tables
            .resets
            .iter()
            .filter(|r| r.code.matches(code))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn find_valid_by_user_id(&self, user_id: &UserId) -> AuthResult<Option<PasswordReset>> {
        let now = Utc::now();
        let tables = self.tables.read().await;
        Ok(tables
            .resets
            .iter()
            .filter(|r| r.user_id == *user_id && r.is_valid_at(now))
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn update(&self, reset: &PasswordReset) -> AuthResult<bool> {
        let mut tables = self.tables.write().await;
        match tables
            .resets
            .iter_mut()
            .find(|r| r.reset_id == reset.reset_id && !r.used)
        {
            Some(stored) => {
                stored.used = reset.used;
                stored.updated_at = reset.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self) -> AuthResult<u64> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;
        let before = tables.resets.len();
        tables.resets.retain(|r| !r.is_expired_at(now));
        Ok((before - tables.resets.len()) as u64)
    }
}

#[cfg(test)]
impl InMemoryAuthRepository {
    pub(crate) async fn reset_count(&self) -> usize {
        self.tables.read().await.resets.len()
    }

    /// Push every record of `user_id` past its expiry
    pub(crate) async fn expire_resets_for(&self, user_id: &UserId) {
        let past = Utc::now() - chrono::Duration::seconds(1);
        let mut tables = self.tables.write().await;
        for reset in tables.resets.iter_mut().filter(|r| r.user_id == *user_id) {
            reset.expires_at = past;
        }
    }

    /// Drop the identity but keep its reset records
    pub(crate) async fn remove_user_only(&self, user_id: &UserId) {
        self.tables.write().await.users.retain(|u| u.user_id != *user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        display_name::DisplayName,
        user_filter::UserFilterParams,
        user_password::{RawPassword, UserPassword},
        user_role::UserRole,
    };

    fn user(email: &str) -> User {
        named("Jane Doe", email, UserRole::Standard)
    }

    fn named(name: &str, email: &str, role: UserRole) -> User {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        User::with_role(
            DisplayName::new(name).unwrap(),
            Email::new(email).unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
            role,
        )
    }

    fn filter(params: UserFilterParams) -> UserFilter {
        UserFilter::new(params).unwrap()
    }

    fn emails(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.email.as_str()).collect()
    }

    #[tokio::test]
    async fn test_update_of_missing_user_reports_false() {
        let repo = InMemoryAuthRepository::new();
        let jane = user("jane@x.com");
        assert!(!UserRepository::update(&repo, &jane).await.unwrap());

        UserRepository::create(&repo, &jane).await.unwrap();
        assert!(UserRepository::update(&repo, &jane).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_filtered_matches_and_orders() {
        let repo = InMemoryAuthRepository::new();
        for u in [
            named("Carol Admin", "carol@corp.com", UserRole::Admin),
            named("Alice Doe", "alice@x.com", UserRole::Standard),
            named("Bob Doe", "bob@x.com", UserRole::Standard),
        ] {
            UserRepository::create(&repo, &u).await.unwrap();
        }

        let by_name = repo
            .find_filtered(&filter(UserFilterParams {
                name: Some("DOE".to_string()),
                sort_by: Some("name".to_string()),
                sort_order: Some("asc".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(emails(&by_name), ["alice@x.com", "bob@x.com"]);

        let by_email = repo
            .find_filtered(&filter(UserFilterParams {
                email: Some("X.COM".to_string()),
                sort_by: Some("email".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(emails(&by_email), ["bob@x.com", "alice@x.com"]);

        let admins = repo
            .find_filtered(&filter(UserFilterParams {
                role: Some("admin".to_string()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(emails(&admins), ["carol@corp.com"]);
    }

    #[tokio::test]
    async fn test_find_filtered_pages() {
        let repo = InMemoryAuthRepository::new();
        for i in 0..12 {
            let u = named("Jane Doe", &format!("user{i:02}@x.com"), UserRole::Standard);
            UserRepository::create(&repo, &u).await.unwrap();
        }

        let page = |page: u32| {
            filter(UserFilterParams {
                sort_by: Some("email".to_string()),
                sort_order: Some("asc".to_string()),
                page: Some(page),
                limit: Some(5),
                ..Default::default()
            })
        };

        let first = repo.find_filtered(&page(1)).await.unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0].email.as_str(), "user00@x.com");

        let last = repo.find_filtered(&page(3)).await.unwrap();
        assert_eq!(emails(&last), ["user10@x.com", "user11@x.com"]);

        assert!(repo.find_filtered(&page(4)).await.unwrap().is_empty());

        let default_page = repo.find_filtered(&UserFilter::default()).await.unwrap();
        assert_eq!(default_page.len(), 10);
    }

    fn reset_for(user: &User) -> PasswordReset {
        PasswordReset::new(user.user_id, user.email.clone(), chrono::Duration::minutes(15))
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = InMemoryAuthRepository::new();
        UserRepository::create(&repo, &user("jane@x.com")).await.unwrap();

        assert!(matches!(
            UserRepository::create(&repo, &user("jane@x.com")).await,
            Err(AuthError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_one_valid_reset_per_user() {
        let repo = InMemoryAuthRepository::new();
        let jane = user("jane@x.com");
        UserRepository::create(&repo, &jane).await.unwrap();

        PasswordResetRepository::create(&repo, &reset_for(&jane)).await.unwrap();
        assert!(matches!(
            PasswordResetRepository::create(&repo, &reset_for(&jane)).await,
            Err(AuthError::ResetAlreadyPending)
        ));

        repo.expire_resets_for(&jane.user_id).await;
        PasswordResetRepository::create(&repo, &reset_for(&jane)).await.unwrap();
        assert_eq!(repo.reset_count().await, 1);
    }

    #[tokio::test]
    async fn test_live_code_collision() {
        let repo = InMemoryAuthRepository::new();
        let jane = user("jane@x.com");
        let john = user("john@x.com");

        let first = reset_for(&jane);
        PasswordResetRepository::create(&repo, &first).await.unwrap();

        let mut second = reset_for(&john);
        second.code = first.code.clone();
        assert!(matches!(
            PasswordResetRepository::create(&repo, &second).await,
            Err(AuthError::ResetCodeCollision)
        ));
    }

    #[tokio::test]
    async fn test_update_consumes_once() {
        let repo = InMemoryAuthRepository::new();
        let jane = user("jane@x.com");
        let mut reset = reset_for(&jane);
        PasswordResetRepository::create(&repo, &reset).await.unwrap();

        reset.mark_used();
        assert!(PasswordResetRepository::update(&repo, &reset).await.unwrap());
        assert!(!PasswordResetRepository::update(&repo, &reset).await.unwrap());
        assert!(repo.find_valid_by_user_id(&jane.user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_resets() {
        let repo = InMemoryAuthRepository::new();
        let jane = user("jane@x.com");
        UserRepository::create(&repo, &jane).await.unwrap();
        PasswordResetRepository::create(&repo, &reset_for(&jane)).await.unwrap();

        assert!(repo.delete(&jane.user_id).await.unwrap());
        assert!(!repo.delete(&jane.user_id).await.unwrap());
        assert_eq!(repo.reset_count().await, 0);
    }
}
