//! Authentication session value object returned by the auth flows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::{Account, AccountRole};
use crate::domain::entities::token::TokenPair;

/// Result of a successful verification or token refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Token scheme, always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in_seconds: i64,

    /// Authenticated account ID
    pub account_id: Uuid,

    /// Canonical phone number of the account
    pub phone: String,

    /// Role of the account
    pub role: AccountRole,

    /// Whether the account profile has been completed
    pub profile_completed: bool,

    /// Whether the account was provisioned by this verification
    pub is_new_account: bool,
}

impl AuthSession {
    /// Builds a session from a freshly issued token pair
    pub fn from_token_pair(pair: TokenPair, account: &Account, is_new_account: bool) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in_seconds: pair.expires_in_seconds,
            account_id: account.id,
            phone: account.phone.as_str().to_string(),
            role: account.role,
            profile_completed: account.profile_completed,
            is_new_account,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::phone::CanonicalPhone;

    #[test]
    fn test_from_token_pair() {
        let account = Account::new(CanonicalPhone::parse("+15550123456").unwrap());
        let pair = TokenPair {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in_seconds: 900,
        };

        let session = AuthSession::from_token_pair(pair, &account, true);

        assert_eq!(session.token_type, "Bearer");
        assert_eq!(session.account_id, account.id);
        assert_eq!(session.phone, "+15550123456");
        assert!(session.is_new_account);
        assert!(!session.profile_completed);
    }
}
