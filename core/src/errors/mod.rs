//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, ValidationError};

use thiserror::Error;

/// Core domain errors
///
/// Everything except `Internal` is an expected, user-facing outcome and is
/// logged at info/warn level at the service boundary. `Internal` is the
/// only category that indicates a fault worth alerting on, and its detail
/// is never exposed to callers.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("rate limit exceeded: {reason}")]
    RateLimited {
        reason: String,
        retry_after_seconds: Option<u64>,
    },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{resource} already exists")]
    Conflict { resource: String },

    #[error("internal error: {message}")]
    Internal { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;
