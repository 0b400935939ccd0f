//! Domain Layer
//!
//! Contains entities, value objects, repository and notifier traits,
//! and the authorization policy.

pub mod entity;
pub mod notifier;
pub mod policy;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{password_reset::PasswordReset, user::User};
pub use notifier::{NotifyError, PasswordResetNotifier, ResetNotice};
pub use policy::Operation;
pub use repository::{PasswordResetRepository, UserRepository};
