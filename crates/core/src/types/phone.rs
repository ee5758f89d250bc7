//! Bangladeshi mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than ASCII digits.
    #[error("phone number must contain digits only")]
    NonDigit,
    /// The input is not exactly the required number of digits.
    #[error("phone number must be exactly {expected} digits")]
    WrongLength {
        /// Required digit count.
        expected: usize,
    },
    /// The number does not start with the local mobile prefix.
    #[error("phone number must start with 01")]
    InvalidPrefix,
    /// The operator digit (third digit) is outside the assigned range.
    #[error("phone number operator digit must be between 3 and 9")]
    InvalidOperatorDigit,
}

/// A Bangladeshi mobile phone number.
///
/// Orders are confirmed over the phone, so the checkout requires a local
/// mobile number in national format.
///
/// ## Constraints
///
/// - Exactly 11 ASCII digits (no `+880` country prefix, no separators)
/// - Starts with `01`
/// - Third digit is 3-9 (the assigned operator ranges)
///
/// ## Examples
///
/// ```
/// use rupshari_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("01712345678").is_ok());
///
/// assert!(PhoneNumber::parse("12345").is_err());        // too short
/// assert!(PhoneNumber::parse("+8801712345678").is_err()); // country prefix
/// assert!(PhoneNumber::parse("01012345678").is_err());  // bad operator digit
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Exact digit count of a national-format mobile number.
    pub const LENGTH: usize = 11;

    /// Parse a `PhoneNumber` from a string. Surrounding whitespace is
    /// trimmed; everything else must be digits.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Contains non-digit characters
    /// - Is not exactly 11 digits
    /// - Does not start with `01` followed by an operator digit 3-9
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }

        if trimmed.len() != Self::LENGTH {
            return Err(PhoneError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !trimmed.starts_with("01") {
            return Err(PhoneError::InvalidPrefix);
        }

        if !matches!(trimmed.as_bytes().get(2), Some(b'3'..=b'9')) {
            return Err(PhoneError::InvalidOperatorDigit);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(PhoneNumber::parse("01312345678").is_ok());
        assert!(PhoneNumber::parse("01712345678").is_ok());
        assert!(PhoneNumber::parse("01912345678").is_ok());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let phone = PhoneNumber::parse(" 01712345678 ").unwrap();
        assert_eq!(phone.as_str(), "01712345678");
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(PhoneNumber::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(PhoneNumber::parse("   "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(PhoneError::WrongLength { expected: 11 })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            PhoneNumber::parse("017123456789"),
            Err(PhoneError::WrongLength { expected: 11 })
        ));
    }

    #[test]
    fn test_parse_rejects_country_prefix() {
        assert!(matches!(
            PhoneNumber::parse("+8801712345678"),
            Err(PhoneError::NonDigit)
        ));
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert!(matches!(
            PhoneNumber::parse("0171234567a"),
            Err(PhoneError::NonDigit)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_prefix() {
        assert!(matches!(
            PhoneNumber::parse("02712345678"),
            Err(PhoneError::InvalidPrefix)
        ));
    }

    #[test]
    fn test_parse_rejects_bad_operator_digit() {
        assert!(matches!(
            PhoneNumber::parse("01012345678"),
            Err(PhoneError::InvalidOperatorDigit)
        ));
        assert!(matches!(
            PhoneNumber::parse("01212345678"),
            Err(PhoneError::InvalidOperatorDigit)
        ));
    }

    #[test]
    fn test_display() {
        let phone = PhoneNumber::parse("01712345678").unwrap();
        assert_eq!(format!("{phone}"), "01712345678");
    }

    #[test]
    fn test_from_str() {
        let phone: PhoneNumber = "01712345678".parse().unwrap();
        assert_eq!(phone.as_str(), "01712345678");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = PhoneNumber::parse("01712345678").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"01712345678\"");

        let parsed: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
