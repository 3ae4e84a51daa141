//! Storage trait for live one-time passcodes.

use async_trait::async_trait;

use crate::domain::entities::otp::OtpEntry;
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainError;

/// Short-lived key-value store for passcodes, keyed by canonical phone.
///
/// Implementations must make each operation atomic per key: a `consume`
/// racing a `put` for the same phone must observe either the old entry or
/// the new one, never a mixture, and two racing `consume` calls must not
/// both succeed for the same entry.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store an entry, overwriting any previous entry for the same phone.
    ///
    /// Overwriting is what invalidates an earlier unconsumed code: at most
    /// one entry is live per phone.
    async fn put(&self, entry: OtpEntry) -> Result<(), DomainError>;

    /// Compare a submitted code against the live entry and consume it on a
    /// match.
    ///
    /// Returns `true` only when a live, unexpired entry exists and the
    /// code matches; the entry is deleted in the same step. On a mismatch
    /// the entry is left in place until it expires or is overwritten.
    async fn consume(&self, phone: &CanonicalPhone, code: &str) -> Result<bool, DomainError>;

    /// Read the live entry without consuming it.
    ///
    /// Expired entries are reported as absent. Used by diagnostics and
    /// test harnesses; the verification flow only ever calls `consume`.
    async fn peek(&self, phone: &CanonicalPhone) -> Result<Option<OtpEntry>, DomainError>;
}
