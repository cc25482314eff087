//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::debug;

use super::converters::model_to_record;
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, TinyUrlError};
use crate::storage::ShortUrlRecord;

use migration::entities::short_url;

impl SeaOrmStorage {
    pub async fn code_exists(&self, code: &str) -> Result<bool> {
        let db = &self.db;

        let count = retry::retry_read(
            &format!("code_exists({})", code),
            self.retry_config,
            || async {
                short_url::Entity::find()
                    .filter(short_url::Column::Code.eq(code))
                    .count(db)
                    .await
            },
        )
        .await
        .map_err(|e| TinyUrlError::database_operation(format!("Failed to check code: {}", e)))?;

        Ok(count > 0)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>> {
        let db = &self.db;

        let model = retry::retry_read(
            &format!("find_by_code({})", code),
            self.retry_config,
            || async {
                short_url::Entity::find()
                    .filter(short_url::Column::Code.eq(code))
                    .one(db)
                    .await
            },
        )
        .await
        .map_err(|e| TinyUrlError::database_operation(format!("Failed to load record: {}", e)))?;

        Ok(model.map(model_to_record))
    }

    pub async fn list_public(&self) -> Result<Vec<ShortUrlRecord>> {
        let db = &self.db;

        let models = retry::retry_read("list_public", self.retry_config, || async {
            short_url::Entity::find()
                .filter(short_url::Column::IsPrivate.eq(false))
                .order_by_desc(short_url::Column::CreatedAt)
                .order_by_asc(short_url::Column::Code)
                .all(db)
                .await
        })
        .await
        .map_err(|e| {
            TinyUrlError::database_operation(format!("Failed to list public records: {}", e))
        })?;

        debug!("Loaded {} public records", models.len());
        Ok(models.into_iter().map(model_to_record).collect())
    }

    /// 查找可清理记录的 id（点击为 0 且创建时间早于 cutoff）
    pub async fn find_unused_before(
        &self,
        cutoff: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<String>> {
        let db = &self.db;

        retry::retry_read("find_unused_before", self.retry_config, || async {
            short_url::Entity::find()
                .select_only()
                .column(short_url::Column::Id)
                .filter(short_url::Column::Clicks.eq(0))
                .filter(short_url::Column::CreatedAt.lt(cutoff))
                .order_by_asc(short_url::Column::CreatedAt)
                .limit(limit)
                .into_tuple::<String>()
                .all(db)
                .await
        })
        .await
        .map_err(|e| {
            TinyUrlError::database_operation(format!("Failed to scan unused records: {}", e))
        })
    }

    pub async fn count(&self) -> Result<u64> {
        let db = &self.db;

        retry::retry_read("count", self.retry_config, || async {
            short_url::Entity::find().count(db).await
        })
        .await
        .map_err(|e| TinyUrlError::database_operation(format!("Failed to count records: {}", e)))
    }
}
