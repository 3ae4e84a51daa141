//! Tests for the authentication orchestration flows.

use chrono::Duration;

use bz_shared::config::OtpConfig;

use crate::domain::entities::account::{Account, AccountRole};
use crate::domain::value_objects::phone::CanonicalPhone;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::account::AccountRepository;

use super::mocks::{auth_harness, default_harness, stored_code};

const PHONE: &str = "+15550123456";
const IP: &str = "203.0.113.9";

fn phone() -> CanonicalPhone {
    CanonicalPhone::parse(PHONE).unwrap()
}

#[tokio::test]
async fn test_request_otp_issues_challenge_and_records_attempt() {
    let h = default_harness();

    let challenge = h.service.request_otp(PHONE, IP).await.unwrap();

    assert_eq!(challenge.expires_in_seconds, 300);
    assert_eq!(challenge.resend_after_seconds, 60);
    assert_eq!(h.ledger.len().await, 1);
    assert!(!stored_code(&h, &phone()).await.is_empty());
}

#[tokio::test]
async fn test_request_otp_rejects_malformed_phone_before_any_state_change() {
    let h = default_harness();

    let err = h.service.request_otp("12345", IP).await.unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
    assert!(h.ledger.is_empty().await);
}

#[tokio::test]
async fn test_request_otp_within_cooldown_is_rate_limited() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    h.clock.advance(Duration::seconds(30));

    let err = h.service.request_otp(PHONE, IP).await.unwrap_err();

    match err {
        DomainError::RateLimited {
            reason,
            retry_after_seconds,
        } => {
            assert_eq!(reason, "cooldown");
            assert_eq!(retry_after_seconds, Some(30));
        }
        other => panic!("expected rate limit error, got {:?}", other),
    }
    // The denied request appended nothing
    assert_eq!(h.ledger.len().await, 1);
}

#[tokio::test]
async fn test_request_otp_allowed_again_after_cooldown() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    h.clock.advance(Duration::seconds(61));

    assert!(h.service.request_otp(PHONE, IP).await.is_ok());
    assert_eq!(h.ledger.len().await, 2);
}

#[tokio::test]
async fn test_verify_otp_provisions_account_on_first_login() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;

    // Differing input format for the same number
    let session = h.service.verify_otp("05550123456", &code).await.unwrap();

    assert!(session.is_new_account);
    assert!(!session.profile_completed);
    assert_eq!(session.role, AccountRole::Regular);
    assert_eq!(session.phone, PHONE);
    assert_eq!(session.token_type, "Bearer");

    let account = h.accounts.find_by_phone(&phone()).await.unwrap();
    assert!(account.is_some());
}

#[tokio::test]
async fn test_verify_otp_returns_existing_account() {
    let h = default_harness();
    let existing = Account::new(phone());
    h.accounts.insert(existing.clone()).await;

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;

    let session = h.service.verify_otp(PHONE, &code).await.unwrap();

    assert!(!session.is_new_account);
    assert_eq!(session.account_id, existing.id);
}

#[tokio::test]
async fn test_verify_otp_wrong_code_fails_and_entry_survives() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;
    let wrong = if code == "0000" { "0001" } else { "0000" };

    let err = h.service.verify_otp(PHONE, wrong).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidOtp)));

    // The correct code still works afterwards
    assert!(h.service.verify_otp(PHONE, &code).await.is_ok());
}

#[tokio::test]
async fn test_verify_otp_is_single_use() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;

    h.service.verify_otp(PHONE, &code).await.unwrap();

    let err = h.service.verify_otp(PHONE, &code).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidOtp)));
}

#[tokio::test]
async fn test_verify_otp_expired_code_fails() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;

    h.clock.advance(Duration::seconds(301));

    let err = h.service.verify_otp(PHONE, &code).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidOtp)));
}

#[tokio::test]
async fn test_deactivated_account_verifies_but_gets_no_session() {
    let h = default_harness();
    let mut account = Account::new(phone());
    account.deactivate();
    h.accounts.insert(account).await;

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;

    let err = h.service.verify_otp(PHONE, &code).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AccountDeactivated)
    ));

    // The passcode was consumed even though issuance was refused
    let err = h.service.verify_otp(PHONE, &code).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidOtp)));
}

#[tokio::test]
async fn test_provisioning_recovers_from_create_race() {
    let h = default_harness();
    h.accounts.race_next_create().await;

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;

    // The create loses the race but the flow still succeeds with the winner
    let session = h.service.verify_otp(PHONE, &code).await.unwrap();
    assert!(!session.is_new_account);
}

#[tokio::test]
async fn test_refresh_rotates_both_tokens() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;
    let session = h.service.verify_otp(PHONE, &code).await.unwrap();

    let refreshed = h
        .service
        .refresh_session(&session.refresh_token)
        .await
        .unwrap();

    assert_eq!(refreshed.account_id, session.account_id);
    assert!(!refreshed.is_new_account);
    assert!(!refreshed.access_token.is_empty());
    assert!(!refreshed.refresh_token.is_empty());
}

#[tokio::test]
async fn test_refresh_rejects_access_token_like_any_invalid_token() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;
    let session = h.service.verify_otp(PHONE, &code).await.unwrap();

    let kind_err = h
        .service
        .refresh_session(&session.access_token)
        .await
        .unwrap_err();
    let garbage_err = h.service.refresh_session("junk.token.here").await.unwrap_err();

    // Wrong-kind and malformed tokens are indistinguishable to the caller
    assert!(matches!(
        kind_err,
        DomainError::Auth(AuthError::InvalidToken)
    ));
    assert!(matches!(
        garbage_err,
        DomainError::Auth(AuthError::InvalidToken)
    ));
}

#[tokio::test]
async fn test_refresh_requires_a_token() {
    let h = default_harness();

    let err = h.service.refresh_session("  ").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::RequiredField { .. })
    ));
}

#[tokio::test]
async fn test_refresh_for_deactivated_account_fails() {
    let h = default_harness();

    h.service.request_otp(PHONE, IP).await.unwrap();
    let code = stored_code(&h, &phone()).await;
    let session = h.service.verify_otp(PHONE, &code).await.unwrap();

    let mut account = h
        .accounts
        .find_by_id(session.account_id)
        .await
        .unwrap()
        .unwrap();
    account.deactivate();
    h.accounts.update(account).await.unwrap();

    let err = h
        .service
        .refresh_session(&session.refresh_token)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::AccountDeactivated)
    ));
}

#[tokio::test]
async fn test_ledger_outage_surfaces_as_internal_error() {
    let h = auth_harness(OtpConfig::default());
    h.ledger.fail_with(true).await;

    let err = h.service.request_otp(PHONE, IP).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
}
