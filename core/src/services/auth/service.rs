//! Main authentication service implementation.

use std::sync::Arc;

use crate::domain::entities::account::Account;
use crate::domain::entities::otp::OtpChallenge;
use crate::domain::entities::token::TokenKind;
use crate::domain::value_objects::auth_session::AuthSession;
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::account::AccountRepository;
use crate::repositories::attempt::AttemptLedger;
use crate::services::otp::{OtpService, OtpStore, SmsSender};
use crate::services::token::TokenService;

use super::rate_limiter::{Admission, OtpRateLimiter};

/// Authentication service composing the passwordless login flow.
///
/// Three public operations: request a passcode, verify a passcode
/// (provisioning the account on first login), and refresh a session. All
/// phone input is normalized here, at the boundary; every collaborator
/// below only ever sees canonical values.
pub struct AuthService<A, L, O, S>
where
    A: AccountRepository,
    L: AttemptLedger,
    O: OtpStore,
    S: SmsSender + 'static,
{
    accounts: Arc<A>,
    otp_service: OtpService<O, S, L>,
    rate_limiter: OtpRateLimiter<L>,
    token_service: TokenService,
}

impl<A, L, O, S> AuthService<A, L, O, S>
where
    A: AccountRepository,
    L: AttemptLedger,
    O: OtpStore,
    S: SmsSender + 'static,
{
    /// Create a new authentication service
    pub fn new(
        accounts: Arc<A>,
        otp_service: OtpService<O, S, L>,
        rate_limiter: OtpRateLimiter<L>,
        token_service: TokenService,
    ) -> Self {
        Self {
            accounts,
            otp_service,
            rate_limiter,
            token_service,
        }
    }

    /// Request a passcode for a phone number.
    ///
    /// Normalizes the input, runs the send-side rate limit rules and, when
    /// admitted, issues a fresh code. Returns challenge metadata telling
    /// the caller when the code expires and when a resend becomes allowed.
    pub async fn request_otp(
        &self,
        raw_phone: &str,
        ip_address: &str,
    ) -> DomainResult<OtpChallenge> {
        let phone = CanonicalPhone::parse(raw_phone)?;

        match self.rate_limiter.admit(&phone, ip_address).await? {
            Admission::Allowed => {}
            Admission::Denied {
                reason,
                retry_after_seconds,
            } => {
                return Err(DomainError::RateLimited {
                    reason: reason.to_string(),
                    retry_after_seconds,
                });
            }
        }

        self.otp_service.issue(&phone, ip_address).await
    }

    /// Verify a passcode and establish a session.
    ///
    /// On a matching code the account is looked up or provisioned, the
    /// active flag is checked, and an access/refresh pair is issued.
    /// Verification success and session issuance are separately gated: a
    /// deactivated account consumes the code but receives no tokens.
    pub async fn verify_otp(&self, raw_phone: &str, code: &str) -> DomainResult<AuthSession> {
        let phone = CanonicalPhone::parse(raw_phone)?;

        if !self.otp_service.verify(&phone, code).await? {
            return Err(AuthError::InvalidOtp.into());
        }

        let (account, is_new_account) = self.find_or_create_account(&phone).await?;

        if !account.is_active {
            tracing::warn!(
                phone = %phone.masked(),
                account_id = %account.id,
                event = "deactivated_account_login",
                "Verified passcode for deactivated account; refusing session"
            );
            return Err(AuthError::AccountDeactivated.into());
        }

        let pair = self.token_service.issue_pair(&account)?;

        tracing::info!(
            phone = %phone.masked(),
            account_id = %account.id,
            is_new_account,
            event = "login_succeeded",
            "Authenticated phone number"
        );

        Ok(AuthSession::from_token_pair(pair, &account, is_new_account))
    }

    /// Exchange a refresh token for a brand-new access/refresh pair.
    ///
    /// Rotation always issues both tokens. The presented refresh token is
    /// not tracked server-side; it simply ages out at its natural expiry.
    pub async fn refresh_session(&self, refresh_token: &str) -> DomainResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(ValidationError::RequiredField {
                field: "refresh_token".to_string(),
            }
            .into());
        }

        let claims = self
            .token_service
            .validate(refresh_token, TokenKind::Refresh)?;

        let account_id = claims
            .account_id()
            .map_err(|_| DomainError::Auth(AuthError::InvalidToken))?;

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "account".to_string(),
            })?;

        if !account.is_active {
            return Err(AuthError::AccountDeactivated.into());
        }

        let pair = self.token_service.issue_pair(&account)?;

        tracing::info!(
            account_id = %account.id,
            event = "session_refreshed",
            "Rotated token pair"
        );

        Ok(AuthSession::from_token_pair(pair, &account, false))
    }

    /// Find the account for a verified phone, creating it on first login.
    ///
    /// Two verifications racing on the same brand-new phone can both reach
    /// the create path; the phone uniqueness constraint is the backstop.
    /// The loser observes a conflict and recovers by re-reading.
    async fn find_or_create_account(
        &self,
        phone: &CanonicalPhone,
    ) -> DomainResult<(Account, bool)> {
        if let Some(existing) = self.accounts.find_by_phone(phone).await? {
            return Ok((existing, false));
        }

        match self.accounts.create(Account::new(phone.clone())).await {
            Ok(created) => {
                tracing::info!(
                    phone = %phone.masked(),
                    account_id = %created.id,
                    event = "account_provisioned",
                    "Created account on first login"
                );
                Ok((created, true))
            }
            Err(DomainError::Conflict { .. }) => self
                .accounts
                .find_by_phone(phone)
                .await?
                .map(|account| (account, false))
                .ok_or_else(|| DomainError::Internal {
                    message: "account create conflicted but re-read found nothing".to_string(),
                }),
            Err(other) => Err(other),
        }
    }
}
