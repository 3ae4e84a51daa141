//! Mapping from domain errors to HTTP responses.
//!
//! Expected outcomes (validation, rate limits, auth failures, not-found)
//! are logged at info/warn level; only internal faults are logged as
//! errors, and their detail never reaches the response body.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use bz_core::errors::{AuthError, DomainError};
use bz_shared::types::response::{error_codes, ErrorResponse};

/// Render a domain error as an HTTP response
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation(e) => {
            log::warn!("request rejected: {}", e);
            HttpResponse::BadRequest()
                .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, e.to_string()))
        }

        DomainError::RateLimited {
            reason,
            retry_after_seconds,
        } => {
            log::warn!("request rate limited: {}", reason);
            let mut body = ErrorResponse::new(
                error_codes::RATE_LIMITED,
                format!("too many requests: {}", reason),
            );
            let mut response = HttpResponse::TooManyRequests();
            if let Some(seconds) = retry_after_seconds {
                body = body.with_retry_after(*seconds);
                response.insert_header(("Retry-After", seconds.to_string()));
            }
            response.json(body)
        }

        DomainError::Auth(auth_error) => {
            log::warn!("authentication failed: {}", auth_error);
            let (mut builder, error_code) = match auth_error {
                AuthError::InvalidOtp => {
                    (HttpResponse::Unauthorized(), error_codes::INVALID_OTP)
                }
                AuthError::InvalidToken => {
                    (HttpResponse::Unauthorized(), error_codes::INVALID_TOKEN)
                }
                AuthError::AccountDeactivated => {
                    (HttpResponse::Forbidden(), error_codes::ACCOUNT_DEACTIVATED)
                }
            };
            builder.json(ErrorResponse::new(error_code, auth_error.to_string()))
        }

        DomainError::NotFound { resource } => {
            log::warn!("resource not found: {}", resource);
            HttpResponse::NotFound().json(ErrorResponse::new(
                error_codes::NOT_FOUND,
                format!("{} not found", resource),
            ))
        }

        DomainError::Conflict { resource } => {
            log::warn!("conflict on {}", resource);
            HttpResponse::Conflict().json(ErrorResponse::new(
                error_codes::CONFLICT,
                format!("{} already exists", resource),
            ))
        }

        DomainError::Internal { message } => {
            // The only category worth alerting on; detail stays server-side
            log::error!("internal failure: {}", message);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "an internal error occurred",
            ))
        }
    }
}

/// Render body validation failures as a 400 response
pub fn validation_failure(errors: &ValidationErrors) -> HttpResponse {
    log::warn!("request body failed validation: {}", errors);
    HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        "invalid request data",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_rate_limited_maps_to_429() {
        let error = DomainError::RateLimited {
            reason: "cooldown".to_string(),
            retry_after_seconds: Some(30),
        };
        let response = domain_error_response(&error);

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry = response.headers().get("Retry-After").unwrap();
        assert_eq!(retry.to_str().unwrap(), "30");
    }

    #[test]
    fn test_auth_failures_map_to_401() {
        let response = domain_error_response(&DomainError::Auth(AuthError::InvalidOtp));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = domain_error_response(&DomainError::Auth(AuthError::InvalidToken));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_deactivated_maps_to_403() {
        let response = domain_error_response(&DomainError::Auth(AuthError::AccountDeactivated));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let error = DomainError::Internal {
            message: "connection pool exhausted at 10.0.0.3".to_string(),
        };
        let response = domain_error_response(&error);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
