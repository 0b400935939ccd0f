//! Display Name Value Object
//!
//! Human-readable name shown in tokens, notices and profile responses.
//!
//! ## Invariants
//! - Trimmed, NFKC normalized
//! - 2 to 100 characters
//! - Letters (any script) and spaces only

use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;
pub const DISPLAY_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNameError {
    Empty,
    TooShort { length: usize, min: usize },
    TooLong { length: usize, max: usize },
    InvalidCharacter { char: char, position: usize },
}

impl fmt::Display for DisplayNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Name is required"),
            Self::TooShort { length, min } => {
                write!(f, "Name is too short ({length} chars, minimum {min})")
            }
            Self::TooLong { length, max } => {
                write!(f, "Name is too long ({length} chars, maximum {max})")
            }
            Self::InvalidCharacter { char, position } => write!(
                f,
                "Invalid character '{char}' at position {position}. Name can only contain letters and spaces"
            ),
        }
    }
}

impl std::error::Error for DisplayNameError {}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(input: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let normalized = input.as_ref().nfkc().collect::<String>().trim().to_string();
        Self::validate(&normalized)?;
        Ok(Self(normalized))
    }

    fn validate(name: &str) -> Result<(), DisplayNameError> {
        if name.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let length = name.chars().count();
        if length < DISPLAY_NAME_MIN_LENGTH {
            return Err(DisplayNameError::TooShort {
                length,
                min: DISPLAY_NAME_MIN_LENGTH,
            });
        }
        if length > DISPLAY_NAME_MAX_LENGTH {
            return Err(DisplayNameError::TooLong {
                length,
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }

        for (position, ch) in name.chars().enumerate() {
            if !(ch.is_alphabetic() || ch == ' ') {
                return Err(DisplayNameError::InvalidCharacter { char: ch, position });
            }
        }

        Ok(())
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DisplayNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayName({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert_eq!(DisplayName::new("Jane Doe").unwrap().as_str(), "Jane Doe");
        assert_eq!(DisplayName::new("  Jo  ").unwrap().as_str(), "Jo");
        assert!(DisplayName::new("José Álvarez").is_ok());
        assert!(DisplayName::new("a".repeat(DISPLAY_NAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(DisplayName::new("   "), Err(DisplayNameError::Empty));
        assert!(matches!(
            DisplayName::new("J"),
            Err(DisplayNameError::TooShort { length: 1, min: 2 })
        ));
        assert!(matches!(
            DisplayName::new("a".repeat(DISPLAY_NAME_MAX_LENGTH + 1)),
            Err(DisplayNameError::TooLong { .. })
        ));
    }

    #[test]
    fn test_rejects_digits_and_symbols() {
        assert!(matches!(
            DisplayName::new("Jane2"),
            Err(DisplayNameError::InvalidCharacter {
                char: '2',
                position: 4
            })
        ));
        assert!(DisplayName::new("Jane_Doe").is_err());
        assert!(DisplayName::new("<script>").is_err());
    }
}
