//! Redis-backed OTP store for multi-node deployments.

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use bz_core::domain::entities::otp::OtpEntry;
use bz_core::domain::value_objects::phone::{mask_phone, CanonicalPhone};
use bz_core::errors::{DomainError, DomainResult};
use bz_core::services::otp::OtpStore;

/// Redis key prefix for live passcodes
const OTP_KEY_PREFIX: &str = "otp:code";

/// Atomic compare-and-delete: consumes the entry only when the submitted
/// code matches the stored one. Runs server-side, so two racing consumers
/// can never both succeed.
const CONSUME_SCRIPT: &str = r#"
local stored = redis.call('GET', KEYS[1])
if not stored then
  return 0
end
local entry = cjson.decode(stored)
if entry.code == ARGV[1] then
  redis.call('DEL', KEYS[1])
  return 1
end
return 0
"#;

/// OTP store backed by Redis with server-side TTL.
///
/// Entries are stored as JSON under `otp:code:<phone>` with an expiry equal
/// to the entry's TTL, so Redis itself removes dead codes. Expiry is
/// therefore wall-clock driven here; the clock-injected in-memory store is
/// the deterministic alternative for tests.
pub struct RedisOtpStore {
    connection: ConnectionManager,
}

impl RedisOtpStore {
    /// Create a store over an established connection manager
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    /// Connect to Redis at the given URL
    pub async fn connect(url: &str) -> DomainResult<Self> {
        let client = redis::Client::open(url).map_err(|e| DomainError::Internal {
            message: format!("invalid redis url: {}", e),
        })?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to connect to redis: {}", e),
            })?;
        Ok(Self::new(connection))
    }

    fn format_key(phone: &CanonicalPhone) -> String {
        format!("{}:{}", OTP_KEY_PREFIX, phone.as_str())
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn put(&self, entry: OtpEntry) -> Result<(), DomainError> {
        let key = Self::format_key(&entry.phone);
        let ttl = (entry.expires_at - entry.issued_at).num_seconds().max(1) as u64;

        let payload = serde_json::to_string(&entry).map_err(|e| DomainError::Internal {
            message: format!("failed to serialize otp entry: {}", e),
        })?;

        let mut conn = self.connection.clone();
        let _: () = conn
            .set_ex(&key, payload, ttl)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to store otp entry: {}", e),
            })?;

        tracing::debug!(
            phone = %entry.phone.masked(),
            ttl_seconds = ttl,
            "Stored passcode in redis"
        );

        Ok(())
    }

    async fn consume(&self, phone: &CanonicalPhone, code: &str) -> Result<bool, DomainError> {
        let key = Self::format_key(phone);
        let mut conn = self.connection.clone();

        let consumed: i64 = Script::new(CONSUME_SCRIPT)
            .key(&key)
            .arg(code)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("failed to consume otp entry: {}", e),
            })?;

        Ok(consumed == 1)
    }

    async fn peek(&self, phone: &CanonicalPhone) -> Result<Option<OtpEntry>, DomainError> {
        let key = Self::format_key(phone);
        let mut conn = self.connection.clone();

        let payload: Option<String> =
            conn.get(&key).await.map_err(|e| DomainError::Internal {
                message: format!("failed to read otp entry: {}", e),
            })?;

        match payload {
            None => Ok(None),
            Some(json) => {
                let entry: OtpEntry =
                    serde_json::from_str(&json).map_err(|e| DomainError::Internal {
                        message: format!(
                            "corrupt otp entry for {}: {}",
                            mask_phone(phone.as_str()),
                            e
                        ),
                    })?;
                // Redis expiry lags wall clock by up to its own resolution
                Ok(Some(entry).filter(|e| !e.is_expired(Utc::now())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let phone = CanonicalPhone::parse("+15550123456").unwrap();
        assert_eq!(RedisOtpStore::format_key(&phone), "otp:code:+15550123456");
    }
}
