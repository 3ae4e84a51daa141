//! # Bazari Infrastructure
//!
//! Backing-store and transport implementations for the core service traits:
//! - `cache` - OTP stores (in-memory and Redis)
//! - `database` - MySQL repositories over sqlx
//! - `memory` - in-memory repositories for development and integration tests
//! - `sms` - SMS transport implementations

pub mod cache;
pub mod database;
pub mod memory;
pub mod sms;

// Re-export commonly used implementations
pub use cache::{MemoryOtpStore, RedisOtpStore};
pub use database::{MySqlAccountRepository, MySqlAttemptLedger};
pub use memory::{MemoryAccountRepository, MemoryAttemptLedger};
pub use sms::SimulatedSmsSender;
