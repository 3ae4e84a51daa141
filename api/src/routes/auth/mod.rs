//! Authentication endpoints.

pub mod refresh;
pub mod request_otp;
pub mod verify_otp;

pub use refresh::refresh_token;
pub use request_otp::request_otp;
pub use verify_otp::verify_otp;

use actix_web::HttpRequest;

/// Extract the client IP address from a request.
///
/// Honors `X-Forwarded-For` (first entry) for reverse-proxy deployments,
/// then `X-Real-IP`, then the peer address.
pub fn extract_client_ip(req: &HttpRequest) -> String {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return ip_str.to_string();
        }
    }

    req.connection_info()
        .peer_addr()
        .unwrap_or("unknown")
        .to_string()
}
