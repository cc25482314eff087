use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{debug, error};

use crate::errors::TinyUrlError;
use crate::services::RedirectService;

use super::helpers::{error_from_tinyurl, error_response};

/// GET /{code}
pub async fn handle_redirect(
    path: web::Path<String>,
    redirect: web::Data<RedirectService>,
) -> HttpResponse {
    let code = path.into_inner();

    match redirect.resolve_and_count(&code).await {
        Ok(target) => HttpResponse::build(StatusCode::FOUND)
            .insert_header(("Location", target))
            .finish(),
        Err(TinyUrlError::NotFound(_)) => {
            debug!("Redirect link not found: {}", code);
            error_response(StatusCode::NOT_FOUND, "URL not found")
        }
        Err(e) => {
            error!("Database error during redirect lookup: {}", e);
            error_from_tinyurl(&e)
        }
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("").route("/{code}", web::get().to(handle_redirect))
}
