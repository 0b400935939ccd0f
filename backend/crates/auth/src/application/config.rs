//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use thiserror::Error;

/// Minimum token signing secret length in bytes (HS256 key size)
pub const MIN_TOKEN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{var} must be at least {min} bytes (got {actual})")]
    SecretTooShort {
        var: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("{var} has an invalid value: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for session tokens
    pub token_secret: Vec<u8>,
    /// `iss` claim written and required on every token
    pub token_issuer: String,
    /// Session token lifetime (24 hours)
    pub token_ttl: Duration,
    /// Reset code lifetime (15 minutes)
    pub reset_code_ttl: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AuthConfig {
    pub const DEFAULT_ISSUER: &'static str = "auth-service";
    pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(24 * 3600);
    pub const DEFAULT_RESET_CODE_TTL: Duration = Duration::from_secs(15 * 60);

    /// Config with defaults around an explicit secret
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_issuer: Self::DEFAULT_ISSUER.to_string(),
            token_ttl: Self::DEFAULT_TOKEN_TTL,
            reset_code_ttl: Self::DEFAULT_RESET_CODE_TTL,
            password_pepper: None,
        }
    }

    /// Load from process environment
    ///
    /// - `JWT_SECRET_KEY` (required, at least 32 bytes)
    /// - `JWT_ISSUER` (default `auth-service`)
    /// - `JWT_TTL_SECS` (default 86400)
    /// - `PASSWORD_PEPPER` (optional, base64)
    ///
    /// There is no fallback secret: a missing or short key is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = var("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;
        if secret.len() < MIN_TOKEN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                var: "JWT_SECRET_KEY",
                min: MIN_TOKEN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        let mut config = Self::new(secret.into_bytes());

        if let Some(issuer) = var("JWT_ISSUER") {
            config.token_issuer = issuer.trim().to_string();
        }

        if let Some(ttl) = var("JWT_TTL_SECS") {
            let secs = ttl
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "JWT_TTL_SECS",
                    reason: format!("expected a positive number of seconds, got {ttl:?}"),
                })?;
            config.token_ttl = Duration::from_secs(secs);
        }

        if let Some(pepper) = var("PASSWORD_PEPPER") {
            let bytes = general_purpose::STANDARD
                .decode(pepper.trim())
                .map_err(|e| ConfigError::Invalid {
                    var: "PASSWORD_PEPPER",
                    reason: e.to_string(),
                })?;
            config.password_pepper = Some(bytes);
        }

        Ok(config)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl.as_secs() as i64
    }

    /// Reset code TTL as a chrono duration for entity timestamps
    pub fn reset_code_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reset_code_ttl.as_secs() as i64)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("token_issuer", &self.token_issuer)
            .field("token_ttl", &self.token_ttl)
            .field("reset_code_ttl", &self.reset_code_ttl)
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
