//! Handler for POST /api/v1/auth/otp/request

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use bz_core::domain::value_objects::phone::mask_phone;
use bz_core::repositories::{AccountRepository, AttemptLedger};
use bz_core::services::otp::{OtpStore, SmsSender};

use crate::app::AppState;
use crate::dto::auth::{OtpChallengeResponse, RequestOtpRequest};
use crate::handlers::error::{domain_error_response, validation_failure};

use super::extract_client_ip;

/// Send a passcode to a phone number. Rate limited to resist abuse.
pub async fn request_otp<A, L, O, S>(
    req: HttpRequest,
    state: web::Data<AppState<A, L, O, S>>,
    body: web::Json<RequestOtpRequest>,
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
        "OTP requested for phone: {}, ip: {}",
        mask_phone(&body.phone),
        client_ip
    );

    match state.auth_service.request_otp(&body.phone, &client_ip).await {
        Ok(challenge) => HttpResponse::Ok().json(OtpChallengeResponse {
            expires_in: challenge.expires_in_seconds,
            resend_after: challenge.resend_after_seconds,
        }),
        Err(error) => domain_error_response(&error),
    }
}
