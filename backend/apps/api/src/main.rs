//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use anyhow::Context;
use auth::application::{AdminSeed, SeedAdminUseCase, SeedOutcome, SweepExpiredResetsUseCase};
use auth::{AuthConfig, DeliveryChannel, HttpNotifier, LogNotifier, PgAuthRepository, auth_router};
use axum::{
    http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // No signing secret, no server
    let auth_config = AuthConfig::from_env().context("Invalid auth configuration")?;

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let repo = Arc::new(PgAuthRepository::new(pool));

    // Startup cleanup: remove expired reset records
    // Errors here should not prevent server startup
    let sweep = SweepExpiredResetsUseCase::new(repo.clone());
    if let Err(e) = sweep.execute().await {
        tracing::warn!(error = %e, "Password reset cleanup failed, continuing anyway");
    }

    let sweep_interval = env_u64("RESET_SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?;
    if sweep_interval > 0 {
        sweep.spawn_periodic(Duration::from_secs(sweep_interval));
        tracing::info!(interval_secs = sweep_interval, "Periodic reset sweep enabled");
    }

    // Optional bootstrap admin
    if let (Ok(email), Ok(password)) = (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
        let name = env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
        let outcome = SeedAdminUseCase::new(repo.clone(), Arc::new(auth_config.clone()))
            .execute(AdminSeed {
                email,
                password,
                name,
            })
            .await
            .context("Admin seed failed")?;
        if outcome == SeedOutcome::Created {
            tracing::info!("Bootstrap admin created");
        }
    }

    // Reset notice delivery
    let notifier = match env::var("NOTIFIER_URL") {
        Ok(url) if !url.trim().is_empty() => {
            let api_key = env::var("NOTIFIER_API_KEY").ok();
            DeliveryChannel::Http(HttpNotifier::new(url.trim(), api_key)?)
        }
        _ => DeliveryChannel::Log(LogNotifier),
    };
    tracing::info!(channel = notifier.name(), "Reset notice channel configured");

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let app = auth_router(repo, Arc::new(notifier), auth_config)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read a non-negative integer variable, falling back to `default` when unset
fn env_u64(key: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
