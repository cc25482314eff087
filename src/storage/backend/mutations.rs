//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DbErr, EntityTrait, ExprTrait, QueryFilter, TransactionTrait};
use tracing::{debug, info};

use super::converters::{model_to_record, record_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{Result, TinyUrlError};
use crate::storage::{InsertOutcome, ShortUrlRecord};

use migration::entities::short_url;

impl SeaOrmStorage {
    /// 插入新记录；短码唯一约束冲突返回 `CodeTaken`
    pub async fn insert(&self, record: &ShortUrlRecord) -> Result<InsertOutcome> {
        let db = &self.db;

        let result = retry::retry_write(
            &format!("insert({})", record.code),
            self.retry_config,
            || async {
                short_url::Entity::insert(record_to_active_model(record))
                    .exec_without_returning(db)
                    .await
            },
        )
        .await;

        match result {
            Ok(_) => {
                debug!("Short url inserted: {}", record.code);
                Ok(InsertOutcome::Inserted)
            }
            Err(e) if retry::is_unique_violation(&e) => {
                debug!("Insert hit unique constraint for code {}", record.code);
                Ok(InsertOutcome::CodeTaken)
            }
            Err(e) => Err(TinyUrlError::database_operation(format!(
                "Failed to insert short url '{}': {}",
                record.code, e
            ))),
        }
    }

    /// 原子自增点击数：`UPDATE ... SET clicks = clicks + 1 WHERE code = ?`
    pub async fn increment_clicks(&self, code: &str) -> Result<Option<ShortUrlRecord>> {
        self.update_clicks_then_fetch(
            "increment_clicks",
            code,
            Expr::col(short_url::Column::Clicks).add(Expr::val(1i64)),
        )
        .await
    }

    pub async fn reset_clicks(&self, code: &str) -> Result<Option<ShortUrlRecord>> {
        self.update_clicks_then_fetch("reset_clicks", code, Expr::val(0i64).into())
            .await
    }

    /// 在同一事务内更新 clicks 并读回记录，未命中时返回 None 且不做任何修改
    async fn update_clicks_then_fetch(
        &self,
        operation: &str,
        code: &str,
        value: Expr,
    ) -> Result<Option<ShortUrlRecord>> {
        let db = &self.db;

        let model = retry::retry_write(
            &format!("{}({})", operation, code),
            self.retry_config,
            || {
                let value = value.clone();
                async move {
                    let txn = db.begin().await?;

                    let updated = short_url::Entity::update_many()
                        .col_expr(short_url::Column::Clicks, value)
                        .filter(short_url::Column::Code.eq(code))
                        .exec(&txn)
                        .await?;

                    if updated.rows_affected == 0 {
                        txn.rollback().await?;
                        return Ok(None);
                    }

                    let model = short_url::Entity::find()
                        .filter(short_url::Column::Code.eq(code))
                        .one(&txn)
                        .await?;

                    txn.commit().await?;
                    Ok::<_, DbErr>(model)
                }
            },
        )
        .await
        .map_err(|e| {
            TinyUrlError::database_operation(format!("Failed to {} for '{}': {}", operation, code, e))
        })?;

        Ok(model.map(model_to_record))
    }

    pub async fn delete_by_code(&self, code: &str) -> Result<bool> {
        let db = &self.db;

        let result = retry::retry_write(
            &format!("delete_by_code({})", code),
            self.retry_config,
            || async {
                short_url::Entity::delete_many()
                    .filter(short_url::Column::Code.eq(code))
                    .exec(db)
                    .await
            },
        )
        .await
        .map_err(|e| TinyUrlError::database_operation(format!("Failed to delete record: {}", e)))?;

        if result.rows_affected > 0 {
            info!("Short url deleted: {}", code);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all(&self) -> Result<u64> {
        let db = &self.db;

        let result = retry::retry_write("delete_all", self.retry_config, || async {
            short_url::Entity::delete_many().exec(db).await
        })
        .await
        .map_err(|e| TinyUrlError::database_operation(format!("Failed to delete records: {}", e)))?;

        info!("Deleted all short urls ({} rows)", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// 按 id 批量删除，DELETE 中再次校验 clicks = 0 与 created_at < cutoff，
    /// 扫描之后才收到首次点击的记录会被保留
    pub async fn delete_unused(&self, ids: &[String], cutoff: DateTime<Utc>) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let db = &self.db;

        let result = retry::retry_write("delete_unused", self.retry_config, || async {
            short_url::Entity::delete_many()
                .filter(short_url::Column::Id.is_in(ids.iter().cloned()))
                .filter(short_url::Column::Clicks.eq(0))
                .filter(short_url::Column::CreatedAt.lt(cutoff))
                .exec(db)
                .await
        })
        .await
        .map_err(|e| {
            TinyUrlError::database_operation(format!("Failed to delete unused records: {}", e))
        })?;

        Ok(result.rows_affected)
    }
}
