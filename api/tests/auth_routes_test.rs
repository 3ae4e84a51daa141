//! Integration tests for the authentication routes over the real
//! in-memory wiring. The OTP store handle stands in for reading the SMS
//! off a handset.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::Value;

use bz_api::app::{create_app, AppState};
use bz_core::domain::value_objects::phone::CanonicalPhone;
use bz_core::services::auth::{AuthService, OtpRateLimiter};
use bz_core::services::clock::SystemClock;
use bz_core::services::otp::{OtpService, OtpStore};
use bz_core::services::token::TokenService;
use bz_infra::cache::MemoryOtpStore;
use bz_infra::memory::{MemoryAccountRepository, MemoryAttemptLedger};
use bz_infra::sms::SimulatedSmsSender;
use bz_shared::config::{JwtConfig, OtpConfig};

type TestState =
    AppState<MemoryAccountRepository, MemoryAttemptLedger, MemoryOtpStore, SimulatedSmsSender>;

fn build_state() -> (web::Data<TestState>, Arc<MemoryOtpStore>) {
    let clock = Arc::new(SystemClock);
    let accounts = Arc::new(MemoryAccountRepository::new());
    let ledger = Arc::new(MemoryAttemptLedger::new());
    let store = Arc::new(MemoryOtpStore::new(clock.clone()));
    let sms = Arc::new(SimulatedSmsSender::new());
    let config = OtpConfig::default();

    let otp_service = OtpService::new(
        store.clone(),
        sms,
        ledger.clone(),
        clock.clone(),
        config.clone(),
    );
    let rate_limiter = OtpRateLimiter::new(ledger, clock, config);
    let token_service = TokenService::new(JwtConfig::new("route-test-secret"));

    let auth_service = Arc::new(AuthService::new(
        accounts,
        otp_service,
        rate_limiter,
        token_service,
    ));

    (web::Data::new(AppState { auth_service }), store)
}

async fn stored_code(store: &MemoryOtpStore, canonical: &str) -> String {
    let phone = CanonicalPhone::parse(canonical).unwrap();
    store
        .peek(&phone)
        .await
        .unwrap()
        .expect("a live code for the phone")
        .code
}

#[actix_web::test]
async fn test_health_endpoint() {
    let (state, _store) = build_state();
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_request_otp_rejects_malformed_phone() {
    let (state, _store) = build_state();
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/request")
            .set_json(serde_json::json!({ "phone": "not-a-phone-at-all" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_request_otp_returns_challenge_metadata() {
    let (state, _store) = build_state();
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/request")
            .set_json(serde_json::json!({ "phone": "+15550123456" }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["expires_in"], 300);
    assert_eq!(body["resend_after"], 60);
}

#[actix_web::test]
async fn test_immediate_resend_is_rate_limited_with_retry_hint() {
    let (state, _store) = build_state();
    let app = test::init_service(create_app(state)).await;

    let request = || {
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/request")
            .insert_header(("X-Forwarded-For", "198.51.100.7"))
            .set_json(serde_json::json!({ "phone": "+15550123456" }))
            .to_request()
    };

    let first = test::call_service(&app, request()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = test::call_service(&app, request()).await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(second.headers().contains_key("Retry-After"));

    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["error"], "RATE_LIMITED");
    let retry = body["retry_after_seconds"].as_u64().unwrap();
    assert!(retry > 0 && retry <= 60);
}

#[actix_web::test]
async fn test_full_login_flow_with_differing_input_formats() {
    let (state, store) = build_state();
    let app = test::init_service(create_app(state)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/request")
            .set_json(serde_json::json!({ "phone": "+10055501234" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let code = stored_code(&store, "+10055501234").await;

    // Verify using the bare national form of the same number
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/verify")
            .set_json(serde_json::json!({ "phone": "0055501234", "code": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["phone"], "+10055501234");
    assert_eq!(body["role"], "regular");
    assert_eq!(body["is_new_account"], true);
    assert_eq!(body["profile_completed"], false);
    assert!(body["access_token"].as_str().unwrap().len() > 20);

    // The same code cannot be used a second time
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/verify")
            .set_json(serde_json::json!({ "phone": "+10055501234", "code": code }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_OTP");
}

#[actix_web::test]
async fn test_refresh_rotates_and_rejects_wrong_kind() {
    let (state, store) = build_state();
    let app = test::init_service(create_app(state)).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/request")
            .set_json(serde_json::json!({ "phone": "+15550123456" }))
            .to_request(),
    )
    .await;
    let code = stored_code(&store, "+15550123456").await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/otp/verify")
            .set_json(serde_json::json!({ "phone": "+15550123456", "code": code }))
            .to_request(),
    )
    .await;
    let session: Value = test::read_body_json(resp).await;

    // Refreshing with the access token fails exactly like a bad token
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(serde_json::json!({ "refresh_token": session["access_token"] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_TOKEN");

    // Refreshing with the refresh token succeeds and rotates the pair
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(serde_json::json!({ "refresh_token": session["refresh_token"] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let refreshed: Value = test::read_body_json(resp).await;
    assert_eq!(refreshed["account_id"], session["account_id"]);
    assert_eq!(refreshed["is_new_account"], false);
    assert!(refreshed["refresh_token"].as_str().unwrap().len() > 20);
}
