//! Stateless JWT token service.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use bz_shared::config::JwtConfig;

use crate::domain::entities::account::Account;
use crate::domain::entities::token::{Claims, TokenKind, TokenPair};
use crate::errors::{AuthError, DomainError, DomainResult};

/// Issues and validates self-contained session tokens.
///
/// Tokens are HS256 JWTs carrying their own expiry; there is no server-side
/// session table and no revocation before natural expiry. Rotation on
/// refresh always mints a brand-new access and refresh token.
///
/// The signing secret is read once at construction; the service itself is
/// immutable and freely shareable across workers.
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Create a new token service from signing configuration
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.validate_exp = true;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry(&self) -> i64 {
        self.config.access_token_expiry
    }

    /// Issue a short-lived access token carrying phone and role claims
    pub fn issue_access(&self, account: &Account) -> DomainResult<String> {
        let claims = Claims::access(
            account.id,
            account.phone.as_str().to_string(),
            account.role,
            self.config.issuer.clone(),
            Utc::now(),
            self.config.access_token_expiry,
        );
        self.encode(&claims)
    }

    /// Issue a longer-lived refresh token carrying only the subject
    pub fn issue_refresh(&self, account_id: Uuid) -> DomainResult<String> {
        let claims = Claims::refresh(
            account_id,
            self.config.issuer.clone(),
            Utc::now(),
            self.config.refresh_token_expiry,
        );
        self.encode(&claims)
    }

    /// Issue a fresh access/refresh pair for an account
    pub fn issue_pair(&self, account: &Account) -> DomainResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access(account)?,
            refresh_token: self.issue_refresh(account.id)?,
            expires_in_seconds: self.config.access_token_expiry,
        })
    }

    /// Validate a token and check it is of the expected kind.
    ///
    /// Every failure cause - bad signature, expiry, malformed input, wrong
    /// issuer, kind mismatch - collapses into the same
    /// [`AuthError::InvalidToken`] so callers cannot probe for the reason a
    /// token was rejected. The cause is still recorded at debug level.
    pub fn validate(&self, token: &str, expected_kind: TokenKind) -> DomainResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected by decoder");
            DomainError::Auth(AuthError::InvalidToken)
        })?;

        if data.claims.kind != expected_kind {
            tracing::debug!(
                expected = ?expected_kind,
                actual = ?data.claims.kind,
                "Token rejected: kind mismatch"
            );
            return Err(DomainError::Auth(AuthError::InvalidToken));
        }

        Ok(data.claims)
    }

    fn encode(&self, claims: &Claims) -> DomainResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            DomainError::Internal {
                message: format!("token signing failed: {}", e),
            }
        })
    }
}
