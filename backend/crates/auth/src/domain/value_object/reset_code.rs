//! Reset Code Value Object
//!
//! Fixed-width, digits-only one-time code that authorizes a single password change.

use kernel::error::app_error::{AppError, AppResult};
use std::fmt;

/// Number of digits in a reset code
pub const RESET_CODE_LENGTH: usize = 6;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResetCode(String);

impl ResetCode {
    /// Parse a caller-supplied code, checking only its shape
    ///
    /// The input is taken verbatim: surrounding whitespace is a bad shape.
    pub fn parse(input: impl AsRef<str>) -> AppResult<Self> {
        let code = input.as_ref();

        if code.is_empty() {
            return Err(AppError::bad_request("Reset code is required"));
        }

        if code.len() != RESET_CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::bad_request(format!(
                "Reset code must be exactly {} digits",
                RESET_CODE_LENGTH
            ))
            .with_action("Enter the code from your reset notice"));
        }

        Ok(Self(code.to_string()))
    }

    /// Draw a fresh code, uniform over every value of the fixed width
    pub fn generate() -> Self {
        Self(platform::crypto::random_numeric_code(RESET_CODE_LENGTH as u32))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Constant-time equality
    pub fn matches(&self, other: &ResetCode) -> bool {
        platform::crypto::constant_time_eq(self.0.as_bytes(), other.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `12****` form for logs
    pub fn masked(&self) -> String {
        let visible: String = self.0.chars().take(2).collect();
        format!("{visible}{}", "*".repeat(self.0.len().saturating_sub(2)))
    }
}

impl fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResetCode").field(&"[REDACTED]").finish()
    }
}
