//! In-memory append-only attempt ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use bz_core::domain::entities::attempt::AttemptRecord;
use bz_core::domain::value_objects::phone::CanonicalPhone;
use bz_core::errors::DomainError;
use bz_core::repositories::attempt::AttemptLedger;

/// In-memory attempt ledger.
///
/// Appends happen under a write lock, so a record is visible to every
/// subsequent count before `append` returns. Retention is unbounded unless
/// the owner calls [`prune_older_than`](Self::prune_older_than)
/// periodically.
pub struct MemoryAttemptLedger {
    records: RwLock<Vec<AttemptRecord>>,
}

impl MemoryAttemptLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Number of records currently retained
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the ledger holds no records
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Drop records older than `cutoff`, returning how many were removed.
    ///
    /// Rate-limit windows only ever look back 24 hours, so anything older
    /// can be discarded without affecting admission decisions.
    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.attempted_at >= cutoff);
        before - records.len()
    }
}

impl Default for MemoryAttemptLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptLedger for MemoryAttemptLedger {
    async fn append(&self, record: AttemptRecord) -> Result<(), DomainError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn count_by_phone_since(
        &self,
        phone: &CanonicalPhone,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| &r.phone == phone && r.attempted_at > since)
            .count() as u64)
    }

    async fn count_by_ip_since(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.ip_address == ip_address && r.attempted_at > since)
            .count() as u64)
    }

    async fn last_attempt_at(
        &self,
        phone: &CanonicalPhone,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| &r.phone == phone)
            .map(|r| r.attempted_at)
            .max())
    }
}
