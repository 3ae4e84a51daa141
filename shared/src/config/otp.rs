//! One-time passcode and rate limiting configuration

use serde::{Deserialize, Serialize};

/// OTP issuance and rate limiting configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Number of digits in a generated passcode
    pub code_length: usize,

    /// Passcode time-to-live in seconds
    pub ttl_seconds: i64,

    /// Minimum delay between two sends to the same phone, in seconds
    pub resend_cooldown_seconds: i64,

    /// Maximum send attempts per phone per rolling 24 hours
    pub max_per_phone_per_day: u32,

    /// Maximum send attempts per phone per rolling minute
    pub per_phone_per_minute: u32,

    /// Maximum send attempts per origin IP per rolling minute
    pub per_ip_per_minute: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 4,
            ttl_seconds: 300, // 5 minutes
            resend_cooldown_seconds: 60,
            max_per_phone_per_day: 5,
            per_phone_per_minute: 3,
            per_ip_per_minute: 10,
        }
    }
}

impl OtpConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            code_length: env_parse("OTP_CODE_LENGTH", defaults.code_length),
            ttl_seconds: env_parse("OTP_TTL_SECONDS", defaults.ttl_seconds),
            resend_cooldown_seconds: env_parse(
                "OTP_RESEND_COOLDOWN_SECONDS",
                defaults.resend_cooldown_seconds,
            ),
            max_per_phone_per_day: env_parse(
                "OTP_MAX_PER_PHONE_PER_DAY",
                defaults.max_per_phone_per_day,
            ),
            per_phone_per_minute: env_parse(
                "OTP_PER_PHONE_PER_MINUTE",
                defaults.per_phone_per_minute,
            ),
            per_ip_per_minute: env_parse("OTP_PER_IP_PER_MINUTE", defaults.per_ip_per_minute),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
