//! Account repository trait defining the interface for account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainError;

/// Repository trait for account persistence operations
///
/// The phone number carries a uniqueness constraint. `create` must surface
/// a constraint violation as [`DomainError::Conflict`] so callers racing on
/// the same brand-new phone can recover by re-reading instead of failing
/// the whole verification flow.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by its canonical phone number
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account registered for this phone
    /// * `Err(DomainError)` - Backing store error
    async fn find_by_phone(&self, phone: &CanonicalPhone) -> Result<Option<Account>, DomainError>;

    /// Find an account by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError>;

    /// Create a new account
    ///
    /// # Returns
    /// * `Ok(Account)` - The created account
    /// * `Err(DomainError::Conflict)` - An account with this phone exists
    /// * `Err(DomainError)` - Backing store error
    async fn create(&self, account: Account) -> Result<Account, DomainError>;

    /// Update an existing account
    async fn update(&self, account: Account) -> Result<Account, DomainError>;
}
