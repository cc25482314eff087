//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::api::constants::SECRET_TOKEN_HEADER;
use crate::errors::TinyUrlError;

use super::types::{ErrorBody, MessageBody};

/// 构建 `{"error": ...}` 响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            error: message.to_string(),
        })
}

/// 构建 `{"message": ...}` 响应
pub fn message_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(MessageBody {
            message: message.into(),
        })
}

/// 从 TinyUrlError 构建错误响应
///
/// 500 只返回通用文案，驱动层细节留在日志里。
pub fn error_from_tinyurl(err: &TinyUrlError) -> HttpResponse {
    let status = err.http_status();
    if !err.is_client_error() {
        error!("API: {}", err);
    }
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        return error_response(status, "Internal server error");
    }
    error_response(status, err.message())
}

/// 读取 `X-Secret-Token`；缺失或非 ASCII 视为未提供
pub fn secret_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(SECRET_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_internal_errors_are_masked() {
        let resp = error_from_tinyurl(&TinyUrlError::database_operation("disk I/O error at 0x1f"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }

    #[actix_web::test]
    async fn test_client_errors_keep_message() {
        let resp = error_from_tinyurl(&TinyUrlError::not_found("URL not found"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "URL not found");
    }

    #[test]
    fn test_secret_token_extraction() {
        let req = TestRequest::default()
            .insert_header((SECRET_TOKEN_HEADER, "s3cret"))
            .to_http_request();
        assert_eq!(secret_token(&req), Some("s3cret"));

        let req = TestRequest::default().to_http_request();
        assert_eq!(secret_token(&req), None);
    }
}
