//! User Resource Use Cases
//!
//! Read, update, delete and list identities on behalf of an authenticated
//! caller. The authorization policy runs before any lookup, so a denied
//! caller learns nothing about whether the target exists.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::authenticate::CurrentUser;
use crate::domain::entity::user::User;
use crate::domain::policy::{self, Operation};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_filter::{UserFilter, UserFilterParams},
};
use crate::error::{AuthError, AuthResult};

pub struct GetUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> GetUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, caller: &CurrentUser, target: &UserId) -> AuthResult<User> {
        policy::authorize(caller.role, &caller.user_id, target, Operation::Read)?;

        self.user_repo
            .find_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Fields left `None` are kept. Role is not updatable.
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub struct UpdateUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> UpdateUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(
        &self,
        caller: &CurrentUser,
        target: &UserId,
        input: UpdateUserInput,
    ) -> AuthResult<User> {
        policy::authorize(caller.role, &caller.user_id, target, Operation::Update)?;

        let name = input.name.map(DisplayName::new).transpose()?;
        let email = input.email.map(Email::new).transpose()?;

        let mut user = self
            .user_repo
            .find_by_id(target)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(email) = email.filter(|e| *e != user.email) {
            if self.user_repo.exists_by_email(&email).await? {
                return Err(AuthError::EmailTaken);
            }
            user.set_email(email);
        }

        if let Some(name) = name {
            user.set_name(name);
        }

        if !self.user_repo.update(&user).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user.user_id, updated_by = %caller.user_id, "User updated");

        Ok(user)
    }
}

pub struct DeleteUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> DeleteUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, caller: &CurrentUser, target: &UserId) -> AuthResult<()> {
        policy::authorize(caller.role, &caller.user_id, target, Operation::Delete)?;

        if !self.user_repo.delete(target).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %target, deleted_by = %caller.user_id, "User deleted");

        Ok(())
    }
}

pub struct ListUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> ListUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    /// Admin only. Bad ordering or role filters are rejected; paging is clamped.
    pub async fn execute(
        &self,
        caller: &CurrentUser,
        params: UserFilterParams,
    ) -> AuthResult<Vec<User>> {
        policy::authorize_admin(caller.role)?;
        let filter = UserFilter::new(params)?;
        self.user_repo.find_filtered(&filter).await
    }
}
