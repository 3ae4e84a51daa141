//! Send-side rate limiting for OTP requests.

use std::sync::Arc;

use chrono::Duration;

use bz_shared::config::OtpConfig;

use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainResult;
use crate::repositories::attempt::AttemptLedger;
use crate::services::clock::Clock;

/// Why an OTP send was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Rolling 24-hour cap for the phone reached
    DailyCapExceeded,
    /// Still inside the resend cooldown for the phone
    ResendCooldown,
    /// Per-phone per-minute throughput reached
    PhoneThroughput,
    /// Per-IP per-minute throughput reached
    IpThroughput,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::DailyCapExceeded => "daily limit",
            Self::ResendCooldown => "cooldown",
            Self::PhoneThroughput => "phone rate limit",
            Self::IpThroughput => "ip rate limit",
        };
        write!(f, "{}", reason)
    }
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The send may proceed
    Allowed,
    /// The send is denied, with an optional wait hint in seconds
    Denied {
        reason: DenyReason,
        retry_after_seconds: Option<u64>,
    },
}

/// Evaluates the send-side rate limit rules against the attempt ledger.
///
/// Rules run in a fixed order and the first failing rule wins:
/// 1. rolling 24-hour cap per phone (no retry hint; the window clears
///    gradually)
/// 2. resend cooldown since the most recent attempt for the phone
/// 3. per-phone throughput over the trailing minute
/// 4. per-IP throughput over the trailing minute
///
/// A ledger failure propagates as an error; it never admits.
pub struct OtpRateLimiter<L: AttemptLedger> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    config: OtpConfig,
}

impl<L: AttemptLedger> OtpRateLimiter<L> {
    /// Create a new rate limiter over the given ledger
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>, config: OtpConfig) -> Self {
        Self {
            ledger,
            clock,
            config,
        }
    }

    /// Decide whether a send to `phone` from `ip_address` may proceed
    pub async fn admit(&self, phone: &CanonicalPhone, ip_address: &str) -> DomainResult<Admission> {
        let now = self.clock.now();

        let attempts_today = self
            .ledger
            .count_by_phone_since(phone, now - Duration::hours(24))
            .await?;
        if attempts_today >= u64::from(self.config.max_per_phone_per_day) {
            tracing::warn!(
                phone = %phone.masked(),
                attempts_today,
                event = "rate_limit_denied",
                rule = "daily_cap",
                "OTP send denied"
            );
            return Ok(Admission::Denied {
                reason: DenyReason::DailyCapExceeded,
                retry_after_seconds: None,
            });
        }

        if let Some(last_attempt) = self.ledger.last_attempt_at(phone).await? {
            let elapsed = (now - last_attempt).num_seconds();
            if elapsed < self.config.resend_cooldown_seconds {
                let retry_after = (self.config.resend_cooldown_seconds - elapsed) as u64;
                tracing::warn!(
                    phone = %phone.masked(),
                    retry_after,
                    event = "rate_limit_denied",
                    rule = "resend_cooldown",
                    "OTP send denied"
                );
                return Ok(Admission::Denied {
                    reason: DenyReason::ResendCooldown,
                    retry_after_seconds: Some(retry_after),
                });
            }
        }

        let one_minute_ago = now - Duration::seconds(60);

        let phone_attempts = self
            .ledger
            .count_by_phone_since(phone, one_minute_ago)
            .await?;
        if phone_attempts >= u64::from(self.config.per_phone_per_minute) {
            tracing::warn!(
                phone = %phone.masked(),
                phone_attempts,
                event = "rate_limit_denied",
                rule = "phone_throughput",
                "OTP send denied"
            );
            return Ok(Admission::Denied {
                reason: DenyReason::PhoneThroughput,
                retry_after_seconds: Some(60),
            });
        }

        let ip_attempts = self
            .ledger
            .count_by_ip_since(ip_address, one_minute_ago)
            .await?;
        if ip_attempts >= u64::from(self.config.per_ip_per_minute) {
            tracing::warn!(
                ip = ip_address,
                ip_attempts,
                event = "rate_limit_denied",
                rule = "ip_throughput",
                "OTP send denied"
            );
            return Ok(Admission::Denied {
                reason: DenyReason::IpThroughput,
                retry_after_seconds: Some(60),
            });
        }

        Ok(Admission::Allowed)
    }
}
