//! Repository interfaces for persistent state, with in-memory mocks for
//! testing. Implementations live in the infrastructure crate.

pub mod account;
pub mod attempt;

pub use account::{AccountRepository, MockAccountRepository};
pub use attempt::{AttemptLedger, MockAttemptLedger};
