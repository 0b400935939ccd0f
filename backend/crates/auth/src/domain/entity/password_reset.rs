//! Password Reset Entity
//!
//! Single-use, time-boxed reset credential.
//!
//! Lifecycle: `Valid -> Used | Expired`. Both end states are terminal:
//! `used` is never cleared and `expires_at` is never moved.

use chrono::{DateTime, Duration, Utc};
use kernel::id::{PasswordResetId, UserId};

use crate::domain::value_object::{email::Email, reset_code::ResetCode};

#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub reset_id: PasswordResetId,
    pub user_id: UserId,
    pub code: ResetCode,
    /// Address the notice was sent to
    pub email: Email,
    pub used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PasswordReset {
    /// Issue a fresh record with a newly drawn code
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn new(user_id: UserId, email: Email, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            reset_id: PasswordResetId::new(),
            user_id,
            code: ResetCode::generate(),
            email,
            used: false,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
        }
    }

    /// Draw a different code, keeping everything else
    ///
    /// Only meaningful before the record is first persisted.
    pub fn regenerate_code(&mut self) {
        self.code = ResetCode::generate();
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Unused and unexpired
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired_at(now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Code matches and the record is still valid
    pub fn validate_code(&self, code: &ResetCode) -> bool {
        self.code.matches(code) && self.is_valid()
    }

    pub fn mark_used(&mut self) {
        self.used = true;
        self.updated_at = Utc::now();
    }

    /// Whole minutes the code was issued for
    pub fn ttl_minutes(&self) -> i64 {
        (self.expires_at - self.created_at).num_minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PasswordReset {
        PasswordReset::new(
            UserId::new(),
            Email::new("jane@x.com").unwrap(),
            Duration::minutes(15),
        )
    }

    #[test]
    fn test_new_record_is_valid() {
        let reset = record();
        assert!(!reset.used);
        assert!(reset.is_valid());
        assert_eq!(reset.ttl_minutes(), 15);
        assert_eq!(reset.code.as_str().len(), 6);
    }

    #[test]
    fn test_validate_code() {
        let reset = record();
        let same = ResetCode::from_db(reset.code.as_str());
        assert!(reset.validate_code(&same));

        let other = if reset.code.as_str() == "000000" {
            "000001"
        } else {
            "000000"
        };
        assert!(!reset.validate_code(&ResetCode::from_db(other)));
    }

    #[test]
    fn test_used_is_terminal() {
        let mut reset = record();
        let code = reset.code.clone();
        reset.mark_used();

        assert!(reset.used);
        assert!(!reset.is_valid());
        assert!(!reset.validate_code(&code));
    }

    #[test]
    fn test_expiry_boundary() {
        let reset = record();
        assert!(reset.is_valid_at(reset.expires_at - Duration::seconds(1)));
        assert!(reset.is_expired_at(reset.expires_at));
        assert!(!reset.is_valid_at(reset.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn test_expired_record_rejects_matching_code() {
        let mut reset = record();
        reset.expires_at = Utc::now() - Duration::seconds(1);
        let code = reset.code.clone();
        assert!(reset.is_expired());
        assert!(!reset.validate_code(&code));
    }
}
