//! Simulated SMS transport.
//!
//! Logs passcodes instead of delivering them. This is the default transport
//! in development and test environments; real carrier integrations plug in
//! behind the same trait.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use bz_core::domain::value_objects::phone::mask_phone;
use bz_core::services::otp::SmsSender;

/// SMS transport that logs instead of sending
pub struct SimulatedSmsSender {
    /// Counter for messages handed to the transport
    message_count: AtomicU64,
    /// Whether to simulate transport failures (for testing)
    simulate_failure: bool,
}

impl SimulatedSmsSender {
    /// Create a new simulated transport
    pub fn new() -> Self {
        Self {
            message_count: AtomicU64::new(0),
            simulate_failure: false,
        }
    }

    /// Create a transport that fails every send
    pub fn failing() -> Self {
        Self {
            message_count: AtomicU64::new(0),
            simulate_failure: true,
        }
    }

    /// Total number of messages accepted so far
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedSmsSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SmsSender for SimulatedSmsSender {
    async fn send(&self, phone: &str, code: &str) -> Result<String, String> {
        if self.simulate_failure {
            tracing::warn!(
                phone = %mask_phone(phone),
                "Simulated SMS transport failure"
            );
            return Err("simulated transport failure".to_string());
        }

        let message_id = format!("sim_{}", Uuid::new_v4());
        let count = self.message_count.fetch_add(1, Ordering::SeqCst) + 1;

        // The full phone and code are deliberately visible here: this is
        // how developers retrieve the passcode without a handset.
        tracing::warn!(
            target: "sms_transport",
            provider = "simulated",
            phone = phone,
            code = code,
            message_id = %message_id,
            message_number = count,
            "Simulated SMS delivery"
        );

        Ok(message_id)
    }
}
