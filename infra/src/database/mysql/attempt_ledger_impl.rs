//! MySQL implementation of the attempt ledger.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE otp_attempts (
//!     id           CHAR(36)    NOT NULL PRIMARY KEY,
//!     phone        VARCHAR(20) NOT NULL,
//!     ip_address   VARCHAR(45) NOT NULL,
//!     success      BOOLEAN     NOT NULL,
//!     attempted_at DATETIME(6) NOT NULL,
//!     INDEX idx_otp_attempts_phone_time (phone, attempted_at),
//!     INDEX idx_otp_attempts_ip_time (ip_address, attempted_at)
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use bz_core::domain::entities::attempt::AttemptRecord;
use bz_core::domain::value_objects::phone::CanonicalPhone;
use bz_core::errors::DomainError;
use bz_core::repositories::attempt::AttemptLedger;

/// Attempt ledger persisted in MySQL
pub struct MySqlAttemptLedger {
    pool: MySqlPool,
}

impl MySqlAttemptLedger {
    /// Create a ledger over an existing connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn internal(context: &str, error: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, error),
    }
}

#[async_trait]
impl AttemptLedger for MySqlAttemptLedger {
    async fn append(&self, record: AttemptRecord) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO otp_attempts (id, phone, ip_address, success, attempted_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(record.phone.as_str())
        .bind(&record.ip_address)
        .bind(record.success)
        .bind(record.attempted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| internal("failed to append attempt record", e))?;

        Ok(())
    }

    async fn count_by_phone_since(
        &self,
        phone: &CanonicalPhone,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM otp_attempts WHERE phone = ? AND attempted_at > ?",
        )
        .bind(phone.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to count attempts by phone", e))?;

        Ok(count as u64)
    }

    async fn count_by_ip_since(
        &self,
        ip_address: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM otp_attempts WHERE ip_address = ? AND attempted_at > ?",
        )
        .bind(ip_address)
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal("failed to count attempts by ip", e))?;

        Ok(count as u64)
    }

    async fn last_attempt_at(
        &self,
        phone: &CanonicalPhone,
    ) -> Result<Option<DateTime<Utc>>, DomainError> {
        let last: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT MAX(attempted_at) FROM otp_attempts WHERE phone = ?")
                .bind(phone.as_str())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| internal("failed to read last attempt", e))?;

        Ok(last)
    }
}
