use actix_cors::Cors;
use tracing::warn;

use crate::api::constants::SECRET_TOKEN_HEADER;
use crate::config::CorsConfig;

/// Validate CORS configuration at startup (runs once)
pub fn validate_cors_config(config: &CorsConfig) {
    if config.allowed_origins.is_empty() {
        warn!(
            "CORS allowed_origins is empty. \
            No cross-origin requests will be allowed. \
            Use '[\"*\"]' for any origin."
        );
    }
}

/// Build CORS middleware from configuration
///
/// The browser frontend lives on another origin and calls every API route,
/// so all methods are allowed along with the secret token header.
pub fn build_cors_middleware(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors.allow_any_method()
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .allowed_header(actix_web::http::header::ACCEPT)
        .allowed_header(SECRET_TOKEN_HEADER)
        .expose_headers([actix_web::http::header::LOCATION])
        .max_age(config.max_age)
}
