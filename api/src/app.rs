//! Application state and factory.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse};

use bz_core::repositories::{AccountRepository, AttemptLedger};
use bz_core::services::auth::AuthService;
use bz_core::services::otp::{OtpStore, SmsSender};

use crate::routes::auth::{refresh_token, request_otp, verify_otp};

/// Shared application state handed to every handler
pub struct AppState<A, L, O, S>
where
    A: AccountRepository,
    L: AttemptLedger,
    O: OtpStore,
    S: SmsSender + 'static,
{
    pub auth_service: Arc<AuthService<A, L, O, S>>,
}

/// Create and configure the application with all routes
pub fn create_app<A, L, O, S>(
    app_state: web::Data<AppState<A, L, O, S>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    A: AccountRepository + 'static,
    L: AttemptLedger + 'static,
    O: OtpStore + 'static,
    S: SmsSender + 'static,
{
    let cors = Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    App::new()
        .app_data(app_state)
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/otp/request", web::post().to(request_otp::<A, L, O, S>))
                    .route("/otp/verify", web::post().to(verify_otp::<A, L, O, S>))
                    .route("/refresh", web::post().to(refresh_token::<A, L, O, S>)),
            ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "bazari-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "NOT_FOUND",
        "message": "the requested resource was not found",
    }))
}
