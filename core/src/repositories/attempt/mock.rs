//! Mock implementation of AttemptLedger for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::attempt::AttemptRecord;
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainError;

use super::trait_::AttemptLedger;

/// Mock attempt ledger for testing
///
/// Holds records in insertion order. `fail_with` makes every call return
/// an internal error, for exercising backing-store failure paths.
pub struct MockAttemptLedger {
    records: Arc<RwLock<Vec<AttemptRecord>>>,
    failing: Arc<RwLock<bool>>,
}

impl MockAttemptLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent call fail with an internal error
    pub async fn fail_with(&self, enabled: bool) {
        *self.failing.write().await = enabled;
    }

    /// Number of records appended so far
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether no records have been appended
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn check_failing(&self) -> Result<(), DomainError> {
        if *self.failing.read().await {
            Err(DomainError::Internal {
                message: "ledger unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for MockAttemptLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AttemptLedger for MockAttemptLedger {
    async fn append(&self, record: AttemptRecord) -> Result<(), DomainError> {
        self.check_failing().await?;
        self.records.write().await.push(record);
        Ok(())
    }

    async fn count_by_phone_since(
        &self,
        phone: &CanonicalPhone,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        self.check_failing().await?;
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
        self.check_failing().await?;
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
        self.check_failing().await?;
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| &r.phone == phone)
            .map(|r| r.attempted_at)
            .max())
    }
}
