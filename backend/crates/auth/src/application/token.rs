//! Session Token Service
//!
//! Issues and validates HMAC-signed JWT bearer tokens. Tokens are
//! self-contained: nothing is stored server side, and there is no revocation,
//! so a valid unexpired token is trusted until `exp`.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Claims carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the identity id
    pub sub: String,
    pub iss: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Not before (unix seconds)
    pub nbf: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl SessionClaims {
    /// Typed identity id, `InvalidToken` if the claim is not one
    pub fn user_id(&self) -> AuthResult<UserId> {
        self.user_id.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Signs and verifies session tokens with one symmetric secret
#[derive(Clone)]
pub struct SessionTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_secs: i64,
}

impl SessionTokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // HMAC family only; anything else (none, RS*, ES*) is rejected before signature checks
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[config.token_issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation,
            issuer: config.token_issuer.clone(),
            ttl_secs: config.token_ttl_secs(),
        }
    }

    /// Issue a token for `user`, valid from now for the configured TTL
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        self.issue_at(user, Utc::now().timestamp())
    }

    /// Issue as if the clock read `now` (unix seconds)
    pub(crate) fn issue_at(&self, user: &User, now: i64) -> AuthResult<String> {
        let claims = SessionClaims {
            sub: user.user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + self.ttl_secs,
            user_id: user.user_id.to_string(),
            email: user.email.as_str().to_string(),
            name: user.name.as_str().to_string(),
            role: user.user_role,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))
    }

    /// Verify signature, algorithm, issuer and time window
    ///
    /// Every failure is reported as the same `InvalidToken`.
    pub fn validate(&self, token: &str) -> AuthResult<SessionClaims> {
        let claims = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Token validation failed");
                AuthError::InvalidToken
            })?;

        // `sub` and `user_id` must name the same identity
        if claims.sub != claims.user_id {
            return Err(AuthError::InvalidToken);
        }
        Email::new(claims.email.as_str()).map_err(|_| AuthError::InvalidToken)?;

        Ok(claims)
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        display_name::DisplayName,
        user_password::{RawPassword, UserPassword},
    };
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const SECRET: &[u8] = b"test-secret-key-with-at-least-32-bytes!";

    fn service() -> SessionTokenService {
        SessionTokenService::new(&AuthConfig::new(SECRET))
    }

    fn jane() -> User {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        User::new(
            DisplayName::new("Jane Doe").unwrap(),
            Email::new("jane@x.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
        )
    }

    #[test]
    fn test_issue_and_validate() {
        let svc = service();
        let user = jane();
        let token = svc.issue(&user).unwrap();
        let claims = svc.validate(&token).unwrap();

        assert_eq!(claims.sub, user.user_id.to_string());
        assert_eq!(claims.user_id().unwrap(), user.user_id);
        assert_eq!(claims.email, "jane@x.com");
        assert_eq!(claims.name, "Jane Doe");
        assert_eq!(claims.role, UserRole::Standard);
        assert_eq!(claims.iss, "auth-service");
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = service();
        let issued = Utc::now().timestamp() - svc.ttl_secs() - 1;
        let token = svc.issue_at(&jane(), issued).unwrap();
        assert!(matches!(svc.validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_not_yet_valid_token_rejected() {
        let svc = service();
        let token = svc
            .issue_at(&jane(), Utc::now().timestamp() + 600)
            .unwrap();
        assert!(matches!(svc.validate(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = service();
        let verifier = SessionTokenService::new(&AuthConfig::new(
            b"another-secret-key-with-32-bytes-or-more".to_vec(),
        ));
        let token = issuer.issue(&jane()).unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuer = service();
        let mut config = AuthConfig::new(SECRET);
        config.token_issuer = "someone-else".to_string();
        let verifier = SessionTokenService::new(&config);

        let token = issuer.issue(&jane()).unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_tampering_any_byte_rejected() {
        let svc = service();
        let token = svc.issue(&jane()).unwrap();

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert!(
                svc.validate(&tampered).is_err(),
                "tampered byte {i} was accepted"
            );
        }
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let svc = service();
        let token = svc.issue(&jane()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let forged = format!("{header}.{payload}.");
        assert!(svc.validate(&forged).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let svc = service();
        assert!(svc.validate("").is_err());
        assert!(svc.validate("invalid.token.here").is_err());
    }
}
