//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod maintenance;
pub mod manage_users;
pub mod request_password_reset;
pub mod reset_password;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use authenticate::{CurrentUser, authenticate};
pub use config::{AuthConfig, ConfigError};
pub use maintenance::{AdminSeed, SeedAdminUseCase, SeedOutcome, SweepExpiredResetsUseCase};
pub use manage_users::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, UpdateUserInput, UpdateUserUseCase,
};
pub use request_password_reset::{
    RESET_REQUEST_MESSAGE, RequestPasswordResetOutput, RequestPasswordResetUseCase,
    ResetRequestOutcome,
};
pub use reset_password::{ResetPasswordInput, ResetPasswordUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{SessionClaims, SessionTokenService};
