//! Mock implementation of AccountRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::account::Account;
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::DomainError;

use super::trait_::AccountRepository;

/// Mock account repository for testing
pub struct MockAccountRepository {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
    race_next_create: Arc<RwLock<bool>>,
}

impl MockAccountRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            race_next_create: Arc::new(RwLock::new(false)),
        }
    }

    /// Pre-seed an account, bypassing the create path
    pub async fn insert(&self, account: Account) {
        self.accounts.write().await.insert(account.id, account);
    }

    /// Make the next `create` lose a simulated race: a competing account
    /// for the same phone lands first and the call reports a conflict.
    pub async fn race_next_create(&self) {
        *self.race_next_create.write().await = true;
    }
}

impl Default for MockAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_phone(&self, phone: &CanonicalPhone) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| &a.phone == phone).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let mut race = self.race_next_create.write().await;
        if *race {
            *race = false;
            let winner = Account::new(account.phone.clone());
            self.accounts.write().await.insert(winner.id, winner);
            return Err(DomainError::Conflict {
                resource: "account".to_string(),
            });
        }
        drop(race);

        let mut accounts = self.accounts.write().await;

        if accounts.values().any(|a| a.phone == account.phone) {
            return Err(DomainError::Conflict {
                resource: "account".to_string(),
            });
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let mut accounts = self.accounts.write().await;

        if !accounts.contains_key(&account.id) {
            return Err(DomainError::NotFound {
                resource: "account".to_string(),
            });
        }

        accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> CanonicalPhone {
        CanonicalPhone::parse("+15550123456").unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MockAccountRepository::new();
        let account = repo.create(Account::new(phone())).await.unwrap();

        let by_phone = repo.find_by_phone(&phone()).await.unwrap();
        assert_eq!(by_phone.as_ref().map(|a| a.id), Some(account.id));

        let by_id = repo.find_by_id(account.id).await.unwrap();
        assert!(by_id.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_phone_conflicts() {
        let repo = MockAccountRepository::new();
        repo.create(Account::new(phone())).await.unwrap();

        let err = repo.create(Account::new(phone())).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_raced_create_leaves_winner_readable() {
        let repo = MockAccountRepository::new();
        repo.race_next_create().await;

        let err = repo.create(Account::new(phone())).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));

        // The competing account is there for the conflict-recovery re-read
        assert!(repo.find_by_phone(&phone()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_update_missing_account() {
        let repo = MockAccountRepository::new();
        let err = repo.update(Account::new(phone())).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
