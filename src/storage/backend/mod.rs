//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
mod mutations;
mod query;
pub mod retry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::errors::{Result, TinyUrlError};
use crate::storage::{InsertOutcome, ShortUrlRecord, UrlStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_record, record_to_active_model};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(TinyUrlError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        let database_url = config.database_url.as_str();
        if database_url.is_empty() {
            return Err(TinyUrlError::database_config("database_url is not set"));
        }

        let retry_config = retry::RetryConfig {
            max_retries: config.retry_count,
            base_delay: std::time::Duration::from_millis(config.retry_base_delay_ms),
            max_delay: std::time::Duration::from_millis(config.retry_max_delay_ms),
        };

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name, config.pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config,
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl UrlStore for SeaOrmStorage {
    fn backend_name(&self) -> &str {
        &self.backend_name
    }

    async fn code_exists(&self, code: &str) -> Result<bool> {
        SeaOrmStorage::code_exists(self, code).await
    }

    async fn insert(&self, record: &ShortUrlRecord) -> Result<InsertOutcome> {
        SeaOrmStorage::insert(self, record).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>> {
        SeaOrmStorage::find_by_code(self, code).await
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<ShortUrlRecord>> {
        SeaOrmStorage::increment_clicks(self, code).await
    }

    async fn reset_clicks(&self, code: &str) -> Result<Option<ShortUrlRecord>> {
        SeaOrmStorage::reset_clicks(self, code).await
    }

    async fn delete_by_code(&self, code: &str) -> Result<bool> {
        SeaOrmStorage::delete_by_code(self, code).await
    }

    async fn delete_all(&self) -> Result<u64> {
        SeaOrmStorage::delete_all(self).await
    }

    async fn list_public(&self) -> Result<Vec<ShortUrlRecord>> {
        SeaOrmStorage::list_public(self).await
    }

    async fn find_unused_before(&self, cutoff: DateTime<Utc>, limit: u64) -> Result<Vec<String>> {
        SeaOrmStorage::find_unused_before(self, cutoff, limit).await
    }

    async fn delete_unused(&self, ids: &[String], cutoff: DateTime<Utc>) -> Result<u64> {
        SeaOrmStorage::delete_unused(self, ids, cutoff).await
    }

    async fn count(&self) -> Result<u64> {
        SeaOrmStorage::count(self).await
    }
}
