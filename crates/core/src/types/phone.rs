//! Phone number type.
//!
//! Numbers are E.164-shaped: an optional leading `+`, then digits with a
//! non-zero first digit. The allowed digit count depends on the form, so
//! parsing takes a [`PhoneRules`].

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains something other than digits after the optional `+`.
    #[error("phone number may only contain digits after an optional leading +")]
    InvalidCharacter,
    /// The first digit is zero.
    #[error("phone number cannot start with 0")]
    LeadingZero,
    /// Fewer digits than allowed.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum digit count.
        min: usize,
    },
    /// More digits than allowed.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum digit count.
        max: usize,
    },
}

/// Digit-count bounds for a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhoneRules {
    pub min_digits: usize,
    pub max_digits: usize,
}

impl PhoneRules {
    /// Store contact numbers: 2 to 15 digits.
    pub const STORE: Self = Self {
        min_digits: 2,
        max_digits: 15,
    };

    /// Merchant numbers must carry a full subscriber number: 10 to 15 digits.
    pub const MERCHANT: Self = Self {
        min_digits: 10,
        max_digits: 15,
    };
}

/// A validated phone number, stored as entered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number under the given digit bounds.
    ///
    /// # Errors
    ///
    /// Returns a [`PhoneError`] describing the first violated constraint.
    pub fn parse(s: &str, rules: PhoneRules) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s.strip_prefix('+').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }

        if digits.starts_with('0') {
            return Err(PhoneError::LeadingZero);
        }

        if digits.len() < rules.min_digits {
            return Err(PhoneError::TooShort {
                min: rules.min_digits,
            });
        }

        if digits.len() > rules.max_digits {
            return Err(PhoneError::TooLong {
                max: rules.max_digits,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_rules_accept_short_numbers() {
        assert!(PhoneNumber::parse("12", PhoneRules::STORE).is_ok());
        assert!(PhoneNumber::parse("+919876543210", PhoneRules::STORE).is_ok());
        assert!(PhoneNumber::parse("123456789012345", PhoneRules::STORE).is_ok());
    }

    #[test]
    fn test_merchant_rules_require_ten_digits() {
        assert_eq!(
            PhoneNumber::parse("98765432", PhoneRules::MERCHANT),
            Err(PhoneError::TooShort { min: 10 })
        );
        assert!(PhoneNumber::parse("9876543210", PhoneRules::MERCHANT).is_ok());
        assert!(PhoneNumber::parse("+14155550123", PhoneRules::MERCHANT).is_ok());
    }

    #[test]
    fn test_too_long() {
        assert_eq!(
            PhoneNumber::parse("1234567890123456", PhoneRules::STORE),
            Err(PhoneError::TooLong { max: 15 })
        );
    }

    #[test]
    fn test_rejects_leading_zero() {
        assert_eq!(
            PhoneNumber::parse("09876543210", PhoneRules::MERCHANT),
            Err(PhoneError::LeadingZero)
        );
        assert_eq!(
            PhoneNumber::parse("+0123", PhoneRules::STORE),
            Err(PhoneError::LeadingZero)
        );
    }

    #[test]
    fn test_rejects_formatting_characters() {
        for input in ["98765 43210", "(987) 654-3210", "+", "++919876543210", "abc"] {
            assert_eq!(
                PhoneNumber::parse(input, PhoneRules::STORE),
                Err(PhoneError::InvalidCharacter),
                "{input}"
            );
        }
    }

    #[test]
    fn test_single_digit_is_too_short_for_store() {
        assert_eq!(
            PhoneNumber::parse("7", PhoneRules::STORE),
            Err(PhoneError::TooShort { min: 2 })
        );
    }

    #[test]
    fn test_keeps_number_as_entered() {
        let phone = PhoneNumber::parse("+919876543210", PhoneRules::MERCHANT).unwrap();
        assert_eq!(phone.as_str(), "+919876543210");
        assert_eq!(phone.to_string(), "+919876543210");
    }
}
