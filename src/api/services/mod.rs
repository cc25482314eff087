pub mod health;
mod helpers;
pub mod links;
pub mod redirect;
pub mod types;

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::web;

pub use health::health_routes;
pub use helpers::{error_from_tinyurl, error_response};
pub use links::links_routes;
pub use redirect::redirect_routes;

use crate::api::constants::MAX_JSON_PAYLOAD;

/// 注册全部路由；`/{code}` 兜底，必须最后注册
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(links_routes())
        .service(health_routes())
        .service(redirect_routes());
}

/// JSON 解析失败统一返回 400 `{"error": ...}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_PAYLOAD)
        .error_handler(|err, _req| {
            let response = error_response(StatusCode::BAD_REQUEST, &err.to_string());
            InternalError::from_response(err, response).into()
        })
}
