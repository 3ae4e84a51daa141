//! OTP store implementations.

pub mod memory_otp_store;
pub mod redis_otp_store;

pub use memory_otp_store::MemoryOtpStore;
pub use redis_otp_store::RedisOtpStore;
