//! Handler for POST /api/v1/auth/refresh

use actix_web::{web, HttpResponse};
use validator::Validate;

use bz_core::repositories::{AccountRepository, AttemptLedger};
use bz_core::services::otp::{OtpStore, SmsSender};

use crate::app::AppState;
use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::{domain_error_response, validation_failure};

/// Exchange a refresh token for a new access/refresh pair (rotation).
pub async fn refresh_token<A, L, O, S>(
    state: web::Data<AppState<A, L, O, S>>,
    body: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    A: AccountRepository + 'static,
    L: AttemptLedger + 'static,
    O: OtpStore + 'static,
    S: SmsSender + 'static,
{
    if let Err(errors) = body.validate() {
        return validation_failure(&errors);
    }

    match state.auth_service.refresh_session(&body.refresh_token).await {
        Ok(session) => HttpResponse::Ok().json(AuthResponse::from(session)),
        Err(error) => domain_error_response(&error),
    }
}
