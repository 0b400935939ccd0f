//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and notifier traits, authorization policy
//! - `application/` - Use cases, session token service, configuration
//! - `infra/` - PostgreSQL and in-memory stores, notice delivery
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Signup / login with email + password, stateless bearer tokens (HS256 JWT)
//! - Password reset through single-use 6-digit codes with a 15 minute lifetime
//! - Role-based access to user resources (`admin`, `user`)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (PHC strings), optional application pepper
//! - Reset requests answer identically whether or not the email is registered
//! - At most one unused reset code per identity, enforced by the store
//! - Token failures are reported uniformly as "invalid or expired"

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use error::{AuthError, AuthResult};
pub use infra::{DeliveryChannel, HttpNotifier, InMemoryAuthRepository, LogNotifier, PgAuthRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
