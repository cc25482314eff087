//! Redirect service tests
//!
//! The hot path: short code → original URL, with an atomic click increment.

use std::sync::Arc;

use chrono::Utc;
use tempfile::TempDir;

use tinyurl::config::DatabaseConfig;
use tinyurl::errors::TinyUrlError;
use tinyurl::services::RedirectService;
use tinyurl::storage::{SeaOrmStorage, ShortUrlRecord, StorageFactory};

// =============================================================================
// Test Setup
// =============================================================================

async fn setup() -> (TempDir, Arc<SeaOrmStorage>, RedirectService) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("redirect_test.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");
    let service = RedirectService::new(storage.clone());
    (temp_dir, storage, service)
}

async fn seed(storage: &SeaOrmStorage, code: &str, url: &str, clicks: u64) {
    let mut record = ShortUrlRecord::new(code, url, false, Utc::now());
    record.clicks = clicks;
    storage.insert(&record).await.expect("Failed to seed record");
}

// =============================================================================
// Resolve
// =============================================================================

#[tokio::test]
async fn test_resolve_returns_target_and_counts() {
    let (_dir, storage, service) = setup().await;
    seed(&storage, "go1234", "https://example.com/target", 0).await;

    let target = service.resolve_and_count("go1234").await.unwrap();
    assert_eq!(target, "https://example.com/target");

    let record = storage.find_by_code("go1234").await.unwrap().unwrap();
    assert_eq!(record.clicks, 1);
}

#[tokio::test]
async fn test_unknown_code_is_not_found_and_mutates_nothing() {
    let (_dir, storage, service) = setup().await;
    seed(&storage, "exists", "https://example.com", 5).await;

    let err = service.resolve_and_count("absent").await.unwrap_err();
    assert!(matches!(err, TinyUrlError::NotFound(_)));

    let record = storage.find_by_code("exists").await.unwrap().unwrap();
    assert_eq!(record.clicks, 5);
    assert_eq!(storage.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_malformed_codes_are_not_found() {
    let (_dir, _storage, service) = setup().await;

    let too_long = "a".repeat(65);
    for code in ["", "with space", "semi;colon", "ünïcode", too_long.as_str()] {
        let err = service.resolve_and_count(code).await.unwrap_err();
        assert!(matches!(err, TinyUrlError::NotFound(_)), "{code:?}");
    }
}

#[tokio::test]
async fn test_codes_are_case_sensitive() {
    let (_dir, storage, service) = setup().await;
    seed(&storage, "AbC123", "https://example.com/upper", 0).await;

    assert!(service.resolve_and_count("abc123").await.is_err());
    assert_eq!(
        service.resolve_and_count("AbC123").await.unwrap(),
        "https://example.com/upper"
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_redirects_lose_no_clicks() {
    let (_dir, storage, service) = setup().await;
    seed(&storage, "hot001", "https://example.com/hot", 7).await;

    let service = Arc::new(service);
    let n = 50;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.resolve_and_count("hot001").await })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.await.unwrap().unwrap(),
            "https://example.com/hot"
        );
    }

    let record = storage.find_by_code("hot001").await.unwrap().unwrap();
    assert_eq!(record.clicks, 7 + n);
}
