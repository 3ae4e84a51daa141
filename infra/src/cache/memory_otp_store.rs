//! In-process OTP store with TTL and a capacity bound.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use constant_time_eq::constant_time_eq;
use tokio::sync::RwLock;

use bz_core::domain::entities::otp::OtpEntry;
use bz_core::domain::value_objects::phone::CanonicalPhone;
use bz_core::errors::DomainError;
use bz_core::services::clock::Clock;
use bz_core::services::otp::OtpStore;

/// Default maximum number of live entries
pub const DEFAULT_CAPACITY: usize = 10_000;

/// In-memory OTP store.
///
/// Suitable for a single-process deployment; a multi-node deployment wants
/// the Redis store instead so all nodes see the same live codes.
///
/// Every mutation happens under one write-lock acquisition, which is what
/// makes `consume` an atomic compare-and-delete per key. Expiry is
/// evaluated against the injected clock. When the capacity bound is hit,
/// expired entries are evicted first, then the oldest live entry.
pub struct MemoryOtpStore {
    entries: RwLock<HashMap<String, OtpEntry>>,
    clock: Arc<dyn Clock>,
    capacity: usize,
}

impl MemoryOtpStore {
    /// Create a store with the default capacity
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_capacity(clock, DEFAULT_CAPACITY)
    }

    /// Create a store bounded to `capacity` live entries
    pub fn with_capacity(clock: Arc<dyn Clock>, capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            capacity: capacity.max(1),
        }
    }

    /// Number of entries currently held, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries at all
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn put(&self, entry: OtpEntry) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        let key = entry.phone.as_str().to_string();

        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let now = self.clock.now();
            entries.retain(|_, e| !e.is_expired(now));

            if entries.len() >= self.capacity {
                if let Some(oldest) = entries
                    .values()
                    .min_by_key(|e| e.issued_at)
                    .map(|e| e.phone.as_str().to_string())
                {
                    tracing::warn!(
                        phone = %entries[&oldest].phone.masked(),
                        event = "otp_store_eviction",
                        "Store at capacity; evicting oldest live entry"
                    );
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(key, entry);
        Ok(())
    }

    async fn consume(&self, phone: &CanonicalPhone, code: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;
        let now = self.clock.now();

        match entries.get(phone.as_str()) {
            None => Ok(false),
            Some(entry) if entry.is_expired(now) => {
                entries.remove(phone.as_str());
                Ok(false)
            }
            Some(entry) => {
                let matched = entry.code.len() == code.len()
                    && constant_time_eq(entry.code.as_bytes(), code.as_bytes());
                if matched {
                    entries.remove(phone.as_str());
                }
                Ok(matched)
            }
        }
    }

    async fn peek(&self, phone: &CanonicalPhone) -> Result<Option<OtpEntry>, DomainError> {
        let entries = self.entries.read().await;
        let now = self.clock.now();
        Ok(entries
            .get(phone.as_str())
            .filter(|e| !e.is_expired(now))
            .cloned())
    }
}
