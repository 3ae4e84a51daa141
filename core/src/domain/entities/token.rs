//! Token entities for JWT-based sessions.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::AccountRole;

/// Kind of a session token
///
/// A closed enum rather than a free-form string so a refresh token can
/// never be mistaken for an access token by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential authorizing API calls
    Access,
    /// Longer-lived credential used only to mint new token pairs
    Refresh,
}

/// Claims structure for the JWT payload
///
/// Tokens are self-contained: validity is determined purely by signature,
/// expiry and kind. There is no server-side session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,

    /// Token kind tag
    pub kind: TokenKind,

    /// Canonical phone number (access tokens only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Account role (access tokens only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AccountRole>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Creates claims for an access token
    pub fn access(
        account_id: Uuid,
        phone: String,
        role: AccountRole,
        issuer: String,
        now: DateTime<Utc>,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            sub: account_id.to_string(),
            kind: TokenKind::Access,
            phone: Some(phone),
            role: Some(role),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: issuer,
        }
    }

    /// Creates claims for a refresh token
    ///
    /// Refresh tokens carry no phone or role; those are re-read from the
    /// account record when the token is redeemed.
    pub fn refresh(account_id: Uuid, issuer: String, now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            sub: account_id.to_string(),
            kind: TokenKind::Refresh,
            phone: None,
            role: None,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: issuer,
        }
    }

    /// Parses the subject back into an account ID
    pub fn account_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Signed token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_carry_identity() {
        let id = Uuid::new_v4();
        let claims = Claims::access(
            id,
            "+15550123456".to_string(),
            AccountRole::Regular,
            "bazari".to_string(),
            Utc::now(),
            900,
        );

        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.phone.as_deref(), Some("+15550123456"));
        assert_eq!(claims.role, Some(AccountRole::Regular));
        assert_eq!(claims.account_id().unwrap(), id);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_claims_carry_no_identity() {
        let claims = Claims::refresh(Uuid::new_v4(), "bazari".to_string(), Utc::now(), 604_800);

        assert_eq!(claims.kind, TokenKind::Refresh);
        assert!(claims.phone.is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_kind_serialization() {
        assert_eq!(serde_json::to_string(&TokenKind::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenKind::Refresh).unwrap(), "\"refresh\"");
    }
}
