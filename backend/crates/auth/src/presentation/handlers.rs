//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use std::sync::Arc;

use kernel::id::UserId;

use crate::application::config::AuthConfig;
use crate::application::token::SessionTokenService;
use crate::application::{
    CurrentUser, DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, RequestPasswordResetUseCase,
    ResetPasswordInput, ResetPasswordUseCase, SignInInput, SignInUseCase, SignUpInput,
    SignUpUseCase, UpdateUserInput, UpdateUserUseCase,
};
use crate::domain::notifier::PasswordResetNotifier;
use crate::domain::repository::{PasswordResetRepository, UserRepository};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    HealthResponse, ListUsersQuery, MessageResponse, PasswordResetConfirmRequest,
    PasswordResetRequest, ProfileResponse, SignInRequest, SignInResponse, SignUpRequest,
    SignUpResponse, UpdateUserRequest, UserResponse,
};

const PASSWORD_RESET_DONE_MESSAGE: &str = "Password has been reset successfully";

/// Storage the handlers need: both repositories behind one value
pub trait AuthStore: UserRepository + PasswordResetRepository + Send + Sync + 'static {}

impl<T> AuthStore for T where T: UserRepository + PasswordResetRepository + Send + Sync + 'static {}

/// Shared state for auth handlers
pub struct AuthAppState<R, N>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<SessionTokenService>,
}

impl<R, N> AuthAppState<R, N>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: AuthConfig) -> Self {
        let tokens = Arc::new(SessionTokenService::new(&config));
        Self {
            repo,
            notifier,
            config: Arc::new(config),
            tokens,
        }
    }
}

// Manual impl: the repository itself need not be `Clone`
impl<R, N> Clone for AuthAppState<R, N>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            notifier: self.notifier.clone(),
            config: self.config.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// POST /api/v1/users/signup
pub async fn sign_up<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<SignUpResponse>)>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(output.into())))
}

/// POST /api/v1/users/login
pub async fn sign_in<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<Json<SignInResponse>>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(SignInInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(SignInResponse {
        token: output.token,
        token_type: "Bearer",
        expires_in: output.expires_in,
        user: output.user.into(),
    }))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/v1/password-reset/request
///
/// Same body for every outcome.
pub async fn request_password_reset<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<PasswordResetRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let use_case = RequestPasswordResetUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.notifier.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(req.email).await?;

    Ok(Json(MessageResponse {
        message: output.message,
    }))
}

/// POST /api/v1/password-reset/reset
pub async fn reset_password<R, N>(
    State(state): State<AuthAppState<R, N>>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let use_case =
        ResetPasswordUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    use_case
        .execute(ResetPasswordInput {
            code: req.code,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: PASSWORD_RESET_DONE_MESSAGE,
    }))
}

// ============================================================================
// Protected (behind the bearer middleware)
// ============================================================================

/// GET /api/v1/profile
pub async fn profile(current: CurrentUser) -> Json<ProfileResponse> {
    Json(current.into())
}

/// GET /api/v1/users
pub async fn list_users<R, N>(
    State(state): State<AuthAppState<R, N>>,
    current: CurrentUser,
    Query(query): Query<ListUsersQuery>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone())
        .execute(&current, query.into())
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/{id}
pub async fn get_user<R, N>(
    State(state): State<AuthAppState<R, N>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let target = parse_user_id(&id)?;
    let user = GetUserUseCase::new(state.repo.clone())
        .execute(&current, &target)
        .await?;

    Ok(Json(user.into()))
}

/// PUT /api/v1/users/{id}
pub async fn update_user<R, N>(
    State(state): State<AuthAppState<R, N>>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let target = parse_user_id(&id)?;
    let user = UpdateUserUseCase::new(state.repo.clone())
        .execute(
            &current,
            &target,
            UpdateUserInput {
                name: req.name,
                email: req.email,
            },
        )
        .await?;

    Ok(Json(user.into()))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user<R, N>(
    State(state): State<AuthAppState<R, N>>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AuthResult<StatusCode>
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let target = parse_user_id(&id)?;
    DeleteUserUseCase::new(state.repo.clone())
        .execute(&current, &target)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_user_id(raw: &str) -> AuthResult<UserId> {
    raw.parse()
        .map_err(|_| AuthError::Validation("Invalid user id".to_string()))
}
