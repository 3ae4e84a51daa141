//! One-time passcode entities.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::phone::CanonicalPhone;

/// A live one-time passcode for a phone number.
///
/// At most one entry is live per phone at any time: issuing a new code
/// overwrites the previous entry, invalidating it. Entries carry their own
/// expiry so stores can evaluate TTL against an injected clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpEntry {
    /// Canonical phone number the code was issued for
    pub phone: CanonicalPhone,

    /// Fixed-length numeric passcode
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp past which the code is no longer valid
    pub expires_at: DateTime<Utc>,
}

impl OtpEntry {
    /// Creates a new entry expiring `ttl_seconds` after `issued_at`
    pub fn new(
        phone: CanonicalPhone,
        code: String,
        issued_at: DateTime<Utc>,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            phone,
            code,
            issued_at,
            expires_at: issued_at + Duration::seconds(ttl_seconds),
        }
    }

    /// Whether the entry has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Challenge metadata returned to the caller after a successful send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// Seconds until the issued code expires
    pub expires_in_seconds: i64,

    /// Seconds until another code may be requested
    pub resend_after_seconds: i64,
}
