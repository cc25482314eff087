use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{info, trace};

use crate::services::HealthService;

pub async fn health_check(health: web::Data<HealthService>) -> impl Responder {
    trace!("Received health check request");

    let report = health.check().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    info!(
        "Health check completed in {}ms, status: {}, uptime: {}s",
        report.response_time_ms, report.status, report.uptime
    );

    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(report)
}

// 简单的就绪检查，只返回 200 状态码
pub async fn readiness_check() -> impl Responder {
    trace!("Received readiness check request");

    HttpResponse::Ok()
        .append_header(("Content-Type", "text/plain"))
        .body("OK")
}

// 活跃性检查
pub async fn liveness_check() -> impl Responder {
    trace!("Received liveness check request");

    HttpResponse::NoContent().finish()
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(health_check))
        .route("", web::head().to(health_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/ready", web::head().to(readiness_check))
        .route("/live", web::get().to(liveness_check))
        .route("/live", web::head().to(liveness_check))
}
