//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use bz_core::domain::entities::account::AccountRole;
use bz_core::domain::value_objects::auth_session::AuthSession;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RequestOtpRequest {
    /// Phone number; accepted in national or international form
    #[validate(length(min = 7, max = 16))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallengeResponse {
    /// Seconds until the issued code expires
    pub expires_in: i64,

    /// Seconds until another code may be requested
    pub resend_after: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 7, max = 16))]
    pub phone: String,

    /// Numeric passcode from the SMS
    #[validate(length(min = 4, max = 8))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub account_id: Uuid,
    pub phone: String,
    pub role: AccountRole,
    pub profile_completed: bool,
    pub is_new_account: bool,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            token_type: session.token_type,
            expires_in: session.expires_in_seconds,
            account_id: session.account_id,
            phone: session.phone,
            role: session.role,
            profile_completed: session.profile_completed,
            is_new_account: session.is_new_account,
        }
    }
}
