//! SMS transport trait.

use async_trait::async_trait;

/// Outbound SMS transport for delivering passcodes.
///
/// Delivery is fire-and-forget from the issuer's point of view: the
/// request-OTP flow never waits for, or fails on, transport errors.
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Send a passcode to a phone number.
    ///
    /// Returns a provider message ID on success and a provider error
    /// message on failure.
    async fn send(&self, phone: &str, code: &str) -> Result<String, String>;
}
