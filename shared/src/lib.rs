//! Shared utilities and common types for the Bazari backend
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types (environment-driven, built once at startup)
//! - Common response structures

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, JwtConfig, OtpConfig, ServerConfig};
pub use types::{error_codes, ErrorResponse};
