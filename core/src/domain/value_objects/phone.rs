//! Canonical phone number value object.
//!
//! Every component downstream of request parsing operates on
//! [`CanonicalPhone`] values only; raw user input never reaches the rate
//! limiter, store, or ledger.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Country calling code accepted by the platform
pub const COUNTRY_CODE: &str = "+1";

/// Fixed length of the national number portion
pub const NATIONAL_NUMBER_LENGTH: usize = 10;

static CANONICAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+1[0-9]{10}$").expect("canonical phone pattern is valid"));

/// A phone number normalized to the single canonical international format:
/// `+1` followed by exactly ten digits.
///
/// Construction goes through [`CanonicalPhone::parse`], which is the only
/// place input formats are interpreted. Parsing is pure and idempotent:
/// feeding a canonical value back in yields the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    /// Parse and canonicalize a raw phone number.
    ///
    /// Whitespace and hyphens are stripped first. Accepted shapes:
    /// - `+1` followed by the national number
    /// - `1` followed by the national number
    /// - a leading `0` followed by the national number (zero dropped)
    /// - the bare national number
    ///
    /// Anything that does not reduce to the canonical format is rejected.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let cleaned: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();

        let candidate = if let Some(rest) = cleaned.strip_prefix(COUNTRY_CODE) {
            format!("{}{}", COUNTRY_CODE, rest)
        } else if cleaned.len() == NATIONAL_NUMBER_LENGTH + 1 && cleaned.starts_with('1') {
            format!("+{}", cleaned)
        } else if cleaned.len() == NATIONAL_NUMBER_LENGTH + 1 && cleaned.starts_with('0') {
            format!("{}{}", COUNTRY_CODE, &cleaned[1..])
        } else if cleaned.len() == NATIONAL_NUMBER_LENGTH {
            format!("{}{}", COUNTRY_CODE, cleaned)
        } else {
            return Err(ValidationError::InvalidPhoneFormat {
                phone: mask_phone(raw),
            });
        };

        if CANONICAL_PATTERN.is_match(&candidate) {
            Ok(Self(candidate))
        } else {
            Err(ValidationError::InvalidPhoneFormat {
                phone: mask_phone(raw),
            })
        }
    }

    /// The canonical string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value, yielding the canonical string
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Masked representation safe for logs
    pub fn masked(&self) -> String {
        mask_phone(&self.0)
    }
}

impl std::fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CanonicalPhone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CanonicalPhone> for String {
    fn from(phone: CanonicalPhone) -> Self {
        phone.0
    }
}

/// Mask a phone number for logging, keeping only the last four digits
pub fn mask_phone(phone: &str) -> String {
    if phone.len() <= 4 {
        "****".to_string()
    } else {
        format!("***{}", &phone[phone.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_input_shapes() {
        let cases = [
            ("+15550123456", "+15550123456"),
            ("15550123456", "+15550123456"),
            ("05550123456", "+15550123456"),
            ("5550123456", "+15550123456"),
            ("0055501234", "+10055501234"),
            ("+1 555 012-3456", "+15550123456"),
            (" 555-012-3456 ", "+15550123456"),
        ];

        for (input, expected) in cases {
            let parsed = CanonicalPhone::parse(input)
                .unwrap_or_else(|_| panic!("expected {:?} to parse", input));
            assert_eq!(parsed.as_str(), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_rejected_inputs() {
        let cases = [
            "",
            "abc",
            "555012345",      // too short
            "55501234567",    // too long, no recognized prefix
            "+2 5550123456",  // wrong country code
            "+1555012345",    // nine national digits
            "+155501234567",  // eleven national digits
            "555O123456",     // letter O, not a digit
        ];

        for input in cases {
            assert!(
                CanonicalPhone::parse(input).is_err(),
                "expected {:?} to be rejected",
                input
            );
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = ["+15550123456", "05550123456", "5550123456", "0055501234"];

        for input in inputs {
            let once = CanonicalPhone::parse(input).unwrap();
            let twice = CanonicalPhone::parse(once.as_str()).unwrap();
            assert_eq!(once, twice, "input {:?}", input);
        }
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let phone: CanonicalPhone = serde_json::from_str("\"05550123456\"").unwrap();
        assert_eq!(phone.as_str(), "+15550123456");

        let err = serde_json::from_str::<CanonicalPhone>("\"not-a-phone\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("+15550123456"), "***3456");
        assert_eq!(mask_phone("123"), "****");
    }
}
