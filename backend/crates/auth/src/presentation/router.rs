//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::notifier::PasswordResetNotifier;
use crate::presentation::handlers::{self, AuthAppState, AuthStore};
use crate::presentation::middleware::require_bearer_auth;

/// Create the Auth router for any store and notifier implementation
///
/// Public: signup, login, password reset request/confirm, health.
/// Everything under `/api/v1/profile` and `/api/v1/users` requires a bearer token.
pub fn auth_router<R, N>(repo: Arc<R>, notifier: Arc<N>, config: AuthConfig) -> Router
where
    R: AuthStore,
    N: PasswordResetNotifier + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, notifier, config);

    let public = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/users/signup", post(handlers::sign_up::<R, N>))
        .route("/api/v1/users/login", post(handlers::sign_in::<R, N>))
        .route(
            "/api/v1/password-reset/request",
            post(handlers::request_password_reset::<R, N>),
        )
        .route(
            "/api/v1/password-reset/reset",
            post(handlers::reset_password::<R, N>),
        );

    let protected = Router::new()
        .route("/api/v1/profile", get(handlers::profile))
        .route("/api/v1/users", get(handlers::list_users::<R, N>))
        .route(
            "/api/v1/users/{id}",
            get(handlers::get_user::<R, N>)
                .put(handlers::update_user::<R, N>)
                .delete(handlers::delete_user::<R, N>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_bearer_auth,
        ));

    public.merge(protected).with_state(state)
}
