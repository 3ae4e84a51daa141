//! Domain-specific error types for authentication operations.
//!
//! All variants here are expected, user-facing outcomes. Presentation-layer
//! status codes and response bodies are derived from them in the API crate.

use thiserror::Error;

/// Authentication failures
///
/// Terminal for the attempt in progress; the caller must restart the flow.
/// Token failures are deliberately a single variant: callers must not be
/// able to distinguish a bad signature from an expired or mistyped token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid or expired one-time passcode")]
    InvalidOtp,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("account is deactivated")]
    AccountDeactivated,
}

/// Input validation failures
///
/// Always recoverable by the caller correcting the input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid phone number format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("required field missing: {field}")]
    RequiredField { field: String },
}
