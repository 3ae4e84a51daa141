//! MySQL repository implementations over sqlx.

pub mod account_repository_impl;
pub mod attempt_ledger_impl;

pub use account_repository_impl::MySqlAccountRepository;
pub use attempt_ledger_impl::MySqlAttemptLedger;
