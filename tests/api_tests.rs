//! HTTP API tests
//!
//! Drives the full route table through `actix_web::test` against SQLite.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::Value;
use tempfile::TempDir;

use tinyurl::api::constants::SECRET_TOKEN_HEADER;
use tinyurl::api::{build_cors_middleware, configure_routes, json_config};
use tinyurl::config::StaticConfig;
use tinyurl::runtime::lifetime::startup::AppServices;
use tinyurl::services::CodeGenerator;
use tinyurl::storage::{SeaOrmStorage, StorageFactory};

const SECRET: &str = "api-test-secret";
const BASE_URL: &str = "https://t.example.com";

// =============================================================================
// Test Setup
// =============================================================================

async fn setup() -> (TempDir, Arc<SeaOrmStorage>, StaticConfig, AppServices) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("api_test.db");

    let mut config = StaticConfig::default();
    config.database.database_url = format!("sqlite://{}?mode=rwc", db_path.display());
    config.app.base_url = BASE_URL.to_string();
    config.app.secret_token = SECRET.to_string();

    let storage = StorageFactory::create(&config.database)
        .await
        .expect("Failed to create storage");
    let services = AppServices::new(
        storage.clone(),
        Arc::new(CodeGenerator::from_entropy()),
        &config,
    )
    .expect("Failed to build services");
    (temp_dir, storage, config, services)
}

macro_rules! init_app {
    ($config:expr, $services:expr) => {
        test::init_service(
            App::new()
                .wrap(build_cors_middleware(&$config.cors))
                .app_data(web::Data::from($services.allocation.clone()))
                .app_data(web::Data::from($services.redirect.clone()))
                .app_data(web::Data::from($services.admin.clone()))
                .app_data(web::Data::from($services.health.clone()))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await
    };
}

fn add_request(url: &str, is_private: bool) -> TestRequest {
    TestRequest::post()
        .uri("/api/add")
        .set_json(serde_json::json!({ "originalURL": url, "isPrivate": is_private }))
}

// =============================================================================
// POST /api/add
// =============================================================================

#[actix_web::test]
async fn test_add_returns_created_with_short_url() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let resp = test::call_service(&app, add_request("https://example.com/long", false).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Location header");

    let body: Value = test::read_body_json(resp).await;
    let short_url = body["shortUrl"].as_str().expect("shortUrl field");
    let code = short_url
        .strip_prefix(&format!("{}/", BASE_URL))
        .expect("short url uses base url");

    assert_eq!(code.len(), 6);
    assert_eq!(location, format!("/{}", code));
    assert!(storage.find_by_code(code).await.unwrap().is_some());
}

#[actix_web::test]
async fn test_add_rejects_invalid_url() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let resp = test::call_service(&app, add_request("not a url", false).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn test_add_rejects_malformed_json() {
    let (_dir, _storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let req = TestRequest::post()
        .uri("/api/add")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"originalURL\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

// =============================================================================
// GET /api/public
// =============================================================================

#[actix_web::test]
async fn test_public_list_hides_private_urls() {
    let (_dir, _storage, config, services) = setup().await;
    let app = init_app!(config, services);

    test::call_service(&app, add_request("https://example.com/public", false).to_request()).await;
    test::call_service(&app, add_request("https://example.com/secret", true).to_request()).await;

    let req = TestRequest::get().uri("/api/public").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 1);

    let item = &items[0];
    assert_eq!(item["originalURL"], "https://example.com/public");
    assert_eq!(item["totalClicks"], 0);
    assert_eq!(item["isPrivate"], false);
    let code = item["code"].as_str().unwrap();
    assert_eq!(item["shortURL"], format!("{}/{}", BASE_URL, code));
}

// =============================================================================
// GET /{code}
// =============================================================================

#[actix_web::test]
async fn test_redirect_and_click_count() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let created = services
        .allocation
        .allocate("https://example.com/dest", false)
        .await
        .unwrap();
    let code = created.record.code;

    for _ in 0..3 {
        let req = TestRequest::get().uri(&format!("/{}", code)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.com/dest"
        );
    }

    assert_eq!(storage.find_by_code(&code).await.unwrap().unwrap().clicks, 3);
}

#[actix_web::test]
async fn test_redirect_unknown_code() {
    let (_dir, _storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let req = TestRequest::get().uri("/nothere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "URL not found");
}

#[actix_web::test]
async fn test_every_accepted_url_redirects() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    // 含换行/制表符的地址写不进 Location 头，必须在创建时拒绝
    for bad in ["https://example.com/a\nb", "https://example.com/a\tb"] {
        let resp = test::call_service(&app, add_request(bad, false).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{:?}", bad);
    }
    assert_eq!(storage.count().await.unwrap(), 0);

    let resp = test::call_service(
        &app,
        add_request("  https://example.com/ok?q=1#top  ", false).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let code = body["shortUrl"]
        .as_str()
        .and_then(|s| s.rsplit('/').next())
        .expect("short code")
        .to_string();

    let req = TestRequest::get().uri(&format!("/{}", code)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://example.com/ok?q=1#top"
    );
    assert_eq!(storage.find_by_code(&code).await.unwrap().unwrap().clicks, 1);
}

// =============================================================================
// DELETE /api/delete/{code}, /api/delete-all
// =============================================================================

#[actix_web::test]
async fn test_delete_requires_secret_token() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let code = services
        .allocation
        .allocate("https://example.com/del", false)
        .await
        .unwrap()
        .record
        .code;
    let uri = format!("/api/delete/{}", code);

    let req = TestRequest::delete().uri(&uri).to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = TestRequest::delete()
        .uri(&uri)
        .insert_header((SECRET_TOKEN_HEADER, "wrong"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert!(storage.find_by_code(&code).await.unwrap().is_some());

    let req = TestRequest::delete()
        .uri(&uri)
        .insert_header((SECRET_TOKEN_HEADER, SECRET))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "URL deleted successfully");

    let req = TestRequest::delete()
        .uri(&uri)
        .insert_header((SECRET_TOKEN_HEADER, SECRET))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "URL not found");
}

#[actix_web::test]
async fn test_delete_all_messages() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let delete_all = || {
        TestRequest::delete()
            .uri("/api/delete-all")
            .insert_header((SECRET_TOKEN_HEADER, SECRET))
            .to_request()
    };

    let body: Value = test::call_and_read_body_json(&app, delete_all()).await;
    assert_eq!(body["message"], "No URLs to delete");

    for i in 0..2 {
        services
            .allocation
            .allocate(&format!("https://example.com/{}", i), false)
            .await
            .unwrap();
    }

    let unauthorized = TestRequest::delete().uri("/api/delete-all").to_request();
    assert_eq!(
        test::call_service(&app, unauthorized).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let body: Value = test::call_and_read_body_json(&app, delete_all()).await;
    assert_eq!(body["message"], "Deleted 2 URLs successfully");
    assert_eq!(storage.count().await.unwrap(), 0);
}

// =============================================================================
// PUT /api/update/{code}
// =============================================================================

#[actix_web::test]
async fn test_update_resets_clicks() {
    let (_dir, storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let code = services
        .allocation
        .allocate("https://example.com/reset", true)
        .await
        .unwrap()
        .record
        .code;
    storage.increment_clicks(&code).await.unwrap();

    let req = TestRequest::put()
        .uri(&format!("/api/update/{}", code))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], code.as_str());
    assert_eq!(body["totalClicks"], 0);
    assert_eq!(body["isPrivate"], true);

    let req = TestRequest::put().uri("/api/update/absent").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

// =============================================================================
// Health / CORS
// =============================================================================

#[actix_web::test]
async fn test_health_endpoints() {
    let (_dir, _storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["backend"], "sqlite");
    assert_eq!(body["checks"]["storage"]["records"], 0);

    let req = TestRequest::get().uri("/health/live").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = TestRequest::get().uri("/health/ready").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "OK");
}

#[actix_web::test]
async fn test_cors_preflight_allows_secret_header() {
    let (_dir, _storage, config, services) = setup().await;
    let app = init_app!(config, services);

    let req = TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/delete-all")
        .insert_header((header::ORIGIN, "https://frontend.example.com"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "x-secret-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert!(
        resp.headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}
