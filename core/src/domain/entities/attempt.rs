//! Attempt records backing the OTP send ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::phone::CanonicalPhone;

/// A single OTP send attempt.
///
/// Records are append-only and serve the rate limiter as a send counter:
/// each is written once with `success = false` when the send is triggered
/// and is never updated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Canonical phone number the code was sent to
    pub phone: CanonicalPhone,

    /// Origin IP address of the request
    pub ip_address: String,

    /// Pending-send marker, written `false` at append time
    pub success: bool,

    /// Timestamp of the attempt
    pub attempted_at: DateTime<Utc>,
}

impl AttemptRecord {
    /// Creates a pending send-attempt record
    pub fn pending(
        phone: CanonicalPhone,
        ip_address: impl Into<String>,
        attempted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone,
            ip_address: ip_address.into(),
            success: false,
            attempted_at,
        }
    }
}
