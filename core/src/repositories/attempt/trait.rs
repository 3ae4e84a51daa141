//! Attempt ledger trait backing the OTP rate limiter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::attempt::AttemptRecord;
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainError;

/// Append-only log of OTP send attempts
///
/// The rate limiter evaluates its windows against this ledger, so an
/// appended record must be visible to subsequent counts before `append`
/// returns. Records are never updated or deleted by the auth flow;
/// retention pruning is an implementation concern.
#[async_trait]
pub trait AttemptLedger: Send + Sync {
    /// Append a send-attempt record
    async fn append(&self, record: AttemptRecord) -> Result<(), DomainError>;

    /// Count attempts for a phone with `attempted_at` after `since`
    async fn count_by_phone_since(
        &self,
        phone: &CanonicalPhone,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Count attempts from an IP with `attempted_at` after `since`
    async fn count_by_ip_since(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError>;

    /// Timestamp of the most recent attempt for a phone, if any
    async fn last_attempt_at(
        &self,
        phone: &CanonicalPhone,
    ) -> Result<Option<DateTime<Utc>>, DomainError>;
}
