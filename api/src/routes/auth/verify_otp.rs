//! Handler for POST /api/v1/auth/otp/verify

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use bz_core::domain::value_objects::phone::mask_phone;
use bz_core::repositories::{AccountRepository, AttemptLedger};
use bz_core::services::otp::{OtpStore, SmsSender};

use crate::app::AppState;
use crate::dto::auth::{AuthResponse, VerifyOtpRequest};
use crate::handlers::error::{domain_error_response, validation_failure};

use super::extract_client_ip;

/// Verify a passcode and receive session tokens. Provisions the account on
/// first successful verification.
pub async fn verify_otp<A, L, O, S>(
    req: HttpRequest,
    state: web::Data<AppState<A, L, O, S>>,
    body: web::Json<VerifyOtpRequest>,
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

    let client_ip = extract_client_ip(&req);
    log::info!(
        "OTP verification attempt for phone: {}, ip: {}",
        mask_phone(&body.phone),
        client_ip
    );

    match state.auth_service.verify_otp(&body.phone, &body.code).await {
        Ok(session) => HttpResponse::Ok().json(AuthResponse::from(session)),
        Err(error) => domain_error_response(&error),
    }
}
