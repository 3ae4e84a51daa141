//! Passcode issuance and verification service.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::Rng;

use bz_shared::config::OtpConfig;

use crate::domain::entities::attempt::AttemptRecord;
use crate::domain::entities::otp::{OtpChallenge, OtpEntry};
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainResult;
use crate::repositories::attempt::AttemptLedger;
use crate::services::clock::Clock;

use super::sms::SmsSender;
use super::store::OtpStore;

/// Issues and verifies one-time passcodes.
///
/// Issuance overwrites any live entry for the phone and appends a pending
/// record to the attempt ledger before the transport send is triggered.
/// Verification is single-use: a matching code is consumed atomically by
/// the store. Failed verifications are not rate-limited here; abuse
/// control happens entirely on the send side.
pub struct OtpService<O, S, L>
where
    O: OtpStore,
    S: SmsSender + 'static,
    L: AttemptLedger,
{
    store: Arc<O>,
    sms: Arc<S>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    config: OtpConfig,
}

impl<O, S, L> OtpService<O, S, L>
where
    O: OtpStore,
    S: SmsSender + 'static,
    L: AttemptLedger,
{
    /// Create a new OTP service
    pub fn new(
        store: Arc<O>,
        sms: Arc<S>,
        ledger: Arc<L>,
        clock: Arc<dyn Clock>,
        config: OtpConfig,
    ) -> Self {
        Self {
            store,
            sms,
            ledger,
            clock,
            config,
        }
    }

    /// Issue a fresh passcode for a phone number.
    ///
    /// Steps, in order:
    /// 1. Generate a fixed-length numeric code
    /// 2. Overwrite the store entry for the phone, invalidating any prior code
    /// 3. Append a pending record to the attempt ledger
    /// 4. Trigger the transport send without waiting for it
    ///
    /// Rate limiting has already happened in the caller; this method only
    /// performs the send itself.
    pub async fn issue(&self, phone: &CanonicalPhone, ip_address: &str) -> DomainResult<OtpChallenge> {
        let now = self.clock.now();
        let code = self.generate_code();

        let entry = OtpEntry::new(phone.clone(), code.clone(), now, self.config.ttl_seconds);
        self.store.put(entry).await?;

        self.ledger
            .append(AttemptRecord::pending(phone.clone(), ip_address, now))
            .await?;

        tracing::info!(
            phone = %phone.masked(),
            event = "otp_issued",
            ttl_seconds = self.config.ttl_seconds,
            "Issued verification code"
        );

        // Delivery is fire-and-forget; transport failures are logged, never
        // surfaced to the caller.
        let sms = Arc::clone(&self.sms);
        let send_to = phone.as_str().to_string();
        let masked = phone.masked();
        tokio::spawn(async move {
            match sms.send(&send_to, &code).await {
                Ok(message_id) => {
                    tracing::debug!(
                        phone = %masked,
                        message_id = %message_id,
                        "Verification code handed to SMS transport"
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        phone = %masked,
                        error = %error,
                        event = "sms_send_failed",
                        "SMS transport rejected verification code"
                    );
                }
            }
        });

        Ok(OtpChallenge {
            expires_in_seconds: self.config.ttl_seconds,
            resend_after_seconds: self.config.resend_cooldown_seconds,
        })
    }

    /// Verify a submitted code.
    ///
    /// Returns `false` when no live entry exists (never issued, expired or
    /// already consumed) or when the code does not match. A match consumes
    /// the entry, so a code can verify at most once.
    pub async fn verify(&self, phone: &CanonicalPhone, code: &str) -> DomainResult<bool> {
        let code = code.trim();
        if code.len() != self.config.code_length || !code.chars().all(|c| c.is_ascii_digit()) {
            tracing::warn!(
                phone = %phone.masked(),
                event = "otp_invalid_format",
                code_length = code.len(),
                "Submitted code has invalid format"
            );
            return Ok(false);
        }

        let matched = self.store.consume(phone, code).await?;

        if matched {
            tracing::info!(
                phone = %phone.masked(),
                event = "otp_verified",
                "Verification code accepted and consumed"
            );
        } else {
            tracing::warn!(
                phone = %phone.masked(),
                event = "otp_rejected",
                "Verification code missing, expired or mismatched"
            );
        }

        Ok(matched)
    }

    /// Generate a uniformly distributed numeric code of the configured
    /// length, leading zeros included.
    fn generate_code(&self) -> String {
        let mut rng = OsRng;
        let upper = 10u64.pow(self.config.code_length as u32);
        let value = rng.gen_range(0..upper);
        format!("{:0width$}", value, width = self.config.code_length)
    }
}
