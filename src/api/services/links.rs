//! `/api` 路由：创建、公开列表、删除、重置点击数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{info, trace};

use crate::services::{AdminService, AllocationService};

use super::helpers::{error_from_tinyurl, message_response, secret_token};
use super::types::{AddUrlRequest, AddUrlResponse, PublicUrl};

/// POST /api/add
pub async fn add_url(
    payload: web::Json<AddUrlRequest>,
    allocation: web::Data<AllocationService>,
) -> HttpResponse {
    let request = payload.into_inner();
    trace!("API: add request for {}", request.original_url);

    match allocation
        .allocate(&request.original_url, request.is_private)
        .await
    {
        Ok(created) => HttpResponse::build(StatusCode::CREATED)
            .append_header(("Location", format!("/{}", created.record.code)))
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(AddUrlResponse {
                short_url: created.short_url,
            }),
        Err(e) => error_from_tinyurl(&e),
    }
}

/// GET /api/public
pub async fn list_public(admin: web::Data<AdminService>) -> HttpResponse {
    match admin.list_public().await {
        Ok(records) => {
            let base_url = admin.base_url();
            let body: Vec<PublicUrl> = records
                .into_iter()
                .map(|r| PublicUrl::from_record(r, base_url))
                .collect();
            trace!("API: returning {} public urls", body.len());
            HttpResponse::Ok()
                .append_header(("Content-Type", "application/json; charset=utf-8"))
                .json(body)
        }
        Err(e) => error_from_tinyurl(&e),
    }
}

/// DELETE /api/delete/{code}
pub async fn delete_url(
    req: HttpRequest,
    path: web::Path<String>,
    admin: web::Data<AdminService>,
) -> HttpResponse {
    let code = path.into_inner();

    match admin.delete_one(&code, secret_token(&req)).await {
        Ok(()) => message_response("URL deleted successfully"),
        Err(e) => error_from_tinyurl(&e),
    }
}

/// DELETE /api/delete-all
pub async fn delete_all(req: HttpRequest, admin: web::Data<AdminService>) -> HttpResponse {
    match admin.delete_all(secret_token(&req)).await {
        Ok(0) => message_response("No URLs to delete"),
        Ok(count) => {
            info!("API: bulk delete removed {} urls", count);
            message_response(format!("Deleted {} URLs successfully", count))
        }
        Err(e) => error_from_tinyurl(&e),
    }
}

/// PUT /api/update/{code}：点击数清零
pub async fn reset_clicks(path: web::Path<String>, admin: web::Data<AdminService>) -> HttpResponse {
    let code = path.into_inner();

    match admin.reset_clicks(&code).await {
        Ok(record) => HttpResponse::Ok()
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(PublicUrl::from_record(record, admin.base_url())),
        Err(e) => error_from_tinyurl(&e),
    }
}

/// 链接管理路由 `/api`
pub fn links_routes() -> actix_web::Scope {
    web::scope("/api")
        .route("/add", web::post().to(add_url))
        .route("/public", web::get().to(list_public))
        .route("/delete-all", web::delete().to(delete_all))
        .route("/delete/{code}", web::delete().to(delete_url))
        .route("/update/{code}", web::put().to(reset_clicks))
}
