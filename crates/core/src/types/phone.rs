//! Customer phone number type.
//!
//! Phone numbers are the primary customer key for desk-placed orders: an
//! existing customer record is matched on the exact normalized number, and
//! repeat-order detection keys on it too. A single canonical form keeps those
//! lookups exact.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Country calling code stripped during normalization.
const COUNTRY_PREFIX: &str = "91";

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number is required")]
    Empty,
    /// The normalized number is not exactly 10 digits.
    #[error("phone number must be exactly 10 digits")]
    WrongLength,
    /// The normalized number starts with 0.
    #[error("phone number must not start with 0")]
    LeadingZero,
}

/// A normalized 10-digit phone number.
///
/// Parsing strips formatting characters, then a single leading zero or a
/// `91` country prefix when one is present. The stored value is always
/// exactly 10 digits and never starts with `0`.
///
/// ## Examples
///
/// ```
/// use order_desk_core::Phone;
///
/// assert_eq!(Phone::parse("98765 43210").unwrap().as_str(), "9876543210");
/// assert_eq!(Phone::parse("09876543210").unwrap().as_str(), "9876543210");
/// assert_eq!(Phone::parse("+91 98765-43210").unwrap().as_str(), "9876543210");
///
/// // A 10-digit number starting with 0 is rejected, not re-interpreted.
/// assert!(Phone::parse("0123456789").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

/// Number of digits in a normalized phone number.
pub const PHONE_DIGITS: usize = 10;

impl Phone {
    /// Parse and normalize a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Contains no digits
    /// - Does not normalize to exactly 10 digits
    /// - Starts with `0` after normalization
    pub fn parse(input: &str) -> Result<Self, PhoneError> {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        let normalized = strip_prefix(&digits);

        if normalized.len() != PHONE_DIGITS {
            return Err(PhoneError::WrongLength);
        }
        if normalized.starts_with('0') {
            return Err(PhoneError::LeadingZero);
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the normalized number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Strip a single leading zero or the country calling prefix, when the
/// remainder would be a full 10-digit number.
fn strip_prefix(digits: &str) -> &str {
    if digits.len() == PHONE_DIGITS + 1
        && let Some(rest) = digits.strip_prefix('0')
    {
        return rest;
    }
    if digits.len() == PHONE_DIGITS + COUNTRY_PREFIX.len()
        && let Some(rest) = digits.strip_prefix(COUNTRY_PREFIX)
    {
        return rest;
    }
    digits
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ten_digits() {
        assert_eq!(Phone::parse("9876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_strips_formatting() {
        assert_eq!(
            Phone::parse("(987) 654-3210").unwrap().as_str(),
            "9876543210"
        );
        assert_eq!(Phone::parse("98765 43210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_strips_single_leading_zero() {
        assert_eq!(Phone::parse("09876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_strips_country_prefix() {
        assert_eq!(
            Phone::parse("+91 9876543210").unwrap().as_str(),
            "9876543210"
        );
        assert_eq!(Phone::parse("919876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_rejects_leading_zero_in_ten_digits() {
        // Exactly 10 digits starting with 0: the zero is part of the number,
        // not a trunk prefix, so the number is invalid.
        assert_eq!(Phone::parse("0123456789"), Err(PhoneError::LeadingZero));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(Phone::parse("12345"), Err(PhoneError::WrongLength));
        assert_eq!(Phone::parse("123456789012345"), Err(PhoneError::WrongLength));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("abc-def"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_double_prefix_not_stripped_twice() {
        // "0" + 11 digits: stripping once leaves 11 digits, still invalid.
        assert_eq!(
            Phone::parse("0919876543210"),
            Err(PhoneError::WrongLength)
        );
    }

    #[test]
    fn test_serde_transparent() {
        let phone = Phone::parse("9876543210").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"9876543210\"");
    }
}
