//! User Entity
//!
//! A registered identity: credential, contact address and role.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_password::UserPassword, user_role::UserRole,
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: DisplayName,
    /// Unique, lower-cased comparison key
    pub email: Email,
    pub password_hash: UserPassword,
    /// Fixed at creation
    pub user_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new standard user
    pub fn new(name: DisplayName, email: Email, password_hash: UserPassword) -> Self {
        Self::with_role(name, email, password_hash, UserRole::Standard)
    }

    pub fn with_role(
        name: DisplayName,
        email: Email,
        password_hash: UserPassword,
        user_role: UserRole,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password_hash,
            user_role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the stored credential
    pub fn set_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    pub fn set_name(&mut self, name: DisplayName) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.user_role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;

    fn jane() -> User {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        User::new(
            DisplayName::new("Jane Doe").unwrap(),
            Email::new("jane@x.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_new_user_is_standard() {
        let user = jane();
        assert_eq!(user.user_role, UserRole::Standard);
        assert!(!user.is_admin());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_set_password_touches_updated_at() {
        let mut user = jane();
        let before = user.updated_at;
        let raw = RawPassword::new("newpass1".to_string()).unwrap();
        user.set_password(UserPassword::from_raw(&raw, None).unwrap());

        assert!(user.updated_at >= before);
        assert!(user.password_hash.verify(&raw, None));
    }
}
