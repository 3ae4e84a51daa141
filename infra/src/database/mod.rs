//! Database-backed repository implementations.

pub mod mysql;

pub use mysql::{MySqlAccountRepository, MySqlAttemptLedger};
