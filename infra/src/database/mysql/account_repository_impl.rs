//! MySQL implementation of the account repository.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE accounts (
//!     id                CHAR(36)     NOT NULL PRIMARY KEY,
//!     phone             VARCHAR(20)  NOT NULL,
//!     display_name      VARCHAR(100) NULL,
//!     role              VARCHAR(20)  NOT NULL,
//!     is_active         BOOLEAN      NOT NULL,
//!     profile_completed BOOLEAN      NOT NULL,
//!     created_at        DATETIME(6)  NOT NULL,
//!     updated_at        DATETIME(6)  NOT NULL,
//!     UNIQUE KEY uq_accounts_phone (phone)
//! );
//! ```
//!
//! The unique key on `phone` is the backstop for concurrent first-login
//! provisioning; the violated insert surfaces as a conflict.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use uuid::Uuid;

use bz_core::domain::entities::account::{Account, AccountRole};
use bz_core::domain::value_objects::phone::CanonicalPhone;
use bz_core::errors::DomainError;
use bz_core::repositories::account::AccountRepository;

/// Account repository persisted in MySQL
pub struct MySqlAccountRepository {
    pool: MySqlPool,
}

impl MySqlAccountRepository {
    /// Create a repository over an existing connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: String,
    phone: String,
    display_name: Option<String>,
    role: String,
    is_active: bool,
    profile_completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, DomainError> {
        let id = Uuid::parse_str(&self.id).map_err(|e| DomainError::Internal {
            message: format!("corrupt account id {}: {}", self.id, e),
        })?;
        let phone = CanonicalPhone::parse(&self.phone).map_err(|_| DomainError::Internal {
            message: "stored phone is not canonical".to_string(),
        })?;
        let role: AccountRole = self.role.parse().map_err(|e| DomainError::Internal {
            message: format!("corrupt account row: {}", e),
        })?;

        Ok(Account {
            id,
            phone,
            display_name: self.display_name,
            role,
            is_active: self.is_active,
            profile_completed: self.profile_completed,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "id, phone, display_name, role, is_active, profile_completed, \
                              created_at, updated_at";

fn internal(context: &str, error: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, error),
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23000"),
        _ => false,
    }
}

#[async_trait]
impl AccountRepository for MySqlAccountRepository {
    async fn find_by_phone(&self, phone: &CanonicalPhone) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE phone = ?",
            SELECT_COLUMNS
        ))
        .bind(phone.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to query account by phone", e))?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM accounts WHERE id = ?",
            SELECT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| internal("failed to query account by id", e))?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn create(&self, account: Account) -> Result<Account, DomainError> {
        let result = sqlx::query(
            "INSERT INTO accounts \
             (id, phone, display_name, role, is_active, profile_completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(account.id.to_string())
        .bind(account.phone.as_str())
        .bind(&account.display_name)
        .bind(account.role.as_str())
        .bind(account.is_active)
        .bind(account.profile_completed)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(account),
            Err(e) if is_unique_violation(&e) => Err(DomainError::Conflict {
                resource: "account".to_string(),
            }),
            Err(e) => Err(internal("failed to create account", e)),
        }
    }

    async fn update(&self, account: Account) -> Result<Account, DomainError> {
        let result = sqlx::query(
            "UPDATE accounts SET display_name = ?, role = ?, is_active = ?, \
             profile_completed = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&account.display_name)
        .bind(account.role.as_str())
        .bind(account.is_active)
        .bind(account.profile_completed)
        .bind(account.updated_at)
        .bind(account.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| internal("failed to update account", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "account".to_string(),
            });
        }

        Ok(account)
    }
}
