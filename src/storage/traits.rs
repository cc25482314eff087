use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::{InsertOutcome, ShortUrlRecord};
use crate::errors::Result;

/// 短链接记录存储
///
/// 服务层只依赖这个 trait。实现方负责：
/// - `code` 唯一约束（插入冲突返回 [`InsertOutcome::CodeTaken`]，而不是错误）
/// - 原子的点击计数自增（并发重定向不能丢失更新）
/// - 瞬时错误的有限重试
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Backend label used in logs and health output.
    fn backend_name(&self) -> &str;

    async fn code_exists(&self, code: &str) -> Result<bool>;

    async fn insert(&self, record: &ShortUrlRecord) -> Result<InsertOutcome>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrlRecord>>;

    /// `clicks = clicks + 1` in one statement; `None` when the code is unknown.
    async fn increment_clicks(&self, code: &str) -> Result<Option<ShortUrlRecord>>;

    async fn reset_clicks(&self, code: &str) -> Result<Option<ShortUrlRecord>>;

    /// Returns whether a row was removed.
    async fn delete_by_code(&self, code: &str) -> Result<bool>;

    async fn delete_all(&self) -> Result<u64>;

    /// Non-private records, newest first.
    async fn list_public(&self) -> Result<Vec<ShortUrlRecord>>;

    /// Ids of never-clicked records created before `cutoff`, oldest first.
    async fn find_unused_before(&self, cutoff: DateTime<Utc>, limit: u64) -> Result<Vec<String>>;

    /// 删除给定 id 中仍满足清理条件的记录，返回实际删除数
    async fn delete_unused(&self, ids: &[String], cutoff: DateTime<Utc>) -> Result<u64>;

    async fn count(&self) -> Result<u64>;
}
