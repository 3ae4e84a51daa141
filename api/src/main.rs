use std::sync::Arc;

use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;

use bz_core::services::auth::{AuthService, OtpRateLimiter};
use bz_core::services::clock::SystemClock;
use bz_core::services::otp::OtpService;
use bz_core::services::token::TokenService;
use bz_infra::cache::MemoryOtpStore;
use bz_infra::memory::{MemoryAccountRepository, MemoryAttemptLedger};
use bz_infra::sms::SimulatedSmsSender;
use bz_shared::config::AppConfig;

use bz_api::app::{create_app, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = AppConfig::from_env();

    // Initialize logger
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or(config.environment.default_log_filter()),
    );

    info!(
        "Starting Bazari API server ({})",
        config.environment
    );
    if config.jwt.is_using_default_secret() {
        log::warn!("JWT_SECRET is not set; using the default development secret");
    }

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    // Single-process wiring: in-memory stores and the simulated SMS
    // transport. A clustered deployment swaps in RedisOtpStore and the
    // MySQL repositories from bz_infra behind the same trait seams.
    let clock = Arc::new(SystemClock);
    let accounts = Arc::new(MemoryAccountRepository::new());
    let ledger = Arc::new(MemoryAttemptLedger::new());
    let otp_store = Arc::new(MemoryOtpStore::new(clock.clone()));
    let sms = Arc::new(SimulatedSmsSender::new());

    let otp_service = OtpService::new(
        otp_store,
        sms,
        ledger.clone(),
        clock.clone(),
        config.otp.clone(),
    );
    let rate_limiter = OtpRateLimiter::new(ledger, clock, config.otp.clone());
    let token_service = TokenService::new(config.jwt.clone());

    let auth_service = Arc::new(AuthService::new(
        accounts,
        otp_service,
        rate_limiter,
        token_service,
    ));

    let app_state = web::Data::new(AppState {
        auth_service,
    });

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
