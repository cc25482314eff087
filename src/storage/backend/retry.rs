//! 数据库瞬时错误重试
//!
//! 失败按"语句是否可能已生效"分类：
//! - `NotApplied`：连接池拿不到连接，或数据库因锁冲突回滚了语句
//! - `InDoubt`：连接中途断开，COMMIT 可能已经落盘
//! - `Fatal`：其余错误（约束冲突、SQL 错误等）
//!
//! 读操作对前两类都重放；写操作（插入、点击自增、删除）只重放 `NotApplied`，
//! 否则 `clicks = clicks + 1` 可能被执行两次。

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use sea_orm::error::RuntimeErr;
use sea_orm::{DbErr, SqlErr};
use tracing::{debug, warn};

/// 失败分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    NotApplied,
    InDoubt,
    Fatal,
}

/// 调用方声明的操作性质
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Read,
    Write,
}

impl Policy {
    fn allows(self, failure: Failure) -> bool {
        match failure {
            Failure::NotApplied => true,
            Failure::InDoubt => self == Policy::Read,
            Failure::Fatal => false,
        }
    }
}

// MySQL 1213/1205，PostgreSQL 40001/40P01，SQLite BUSY(5)/LOCKED(6)
const LOCK_CONFLICT_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

const LOCK_CONFLICT_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "database table is locked",
    "serialization failure",
    "could not serialize access",
];

pub fn classify(err: &DbErr) -> Failure {
    match err {
        DbErr::ConnectionAcquire(_) => Failure::NotApplied,
        DbErr::Conn(_) => Failure::InDoubt,
        DbErr::Exec(runtime) | DbErr::Query(runtime) if is_lock_conflict(runtime) => {
            Failure::NotApplied
        }
        _ => Failure::Fatal,
    }
}

fn is_lock_conflict(err: &RuntimeErr) -> bool {
    let message = match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            let code = sqlx_err
                .as_database_error()
                .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
            if let Some(code) = code {
                return LOCK_CONFLICT_CODES.contains(&code.as_str());
            }
            sqlx_err.to_string()
        }
        RuntimeErr::Internal(msg) => msg.clone(),
        #[allow(unreachable_patterns)]
        _ => return false,
    };

    let message = message.to_lowercase();
    LOCK_CONFLICT_MESSAGES.iter().any(|m| message.contains(m))
}

/// 唯一约束冲突（短码已被占用），交给分配逻辑换码
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// 重试参数，来自 `[database]` 配置段
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryConfig {
    /// 第 `retry` 次重试前的等待：base * 2^(retry-1)，封顶 max，再加 0-25% 抖动
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        let capped = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let jitter_ms = rand::rng().random_range(0..=capped.as_millis() as u64 / 4);
        capped + Duration::from_millis(jitter_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(30),
        }
    }
}

pub async fn retry_read<T, F, Fut>(label: &str, config: RetryConfig, op: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    run(label, Policy::Read, config, op).await
}

pub async fn retry_write<T, F, Fut>(label: &str, config: RetryConfig, op: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    run(label, Policy::Write, config, op).await
}

async fn run<T, F, Fut>(
    label: &str,
    policy: Policy,
    config: RetryConfig,
    mut op: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut retries = 0;
    loop {
        let err = match op().await {
            Ok(value) => {
                if retries > 0 {
                    debug!("{} succeeded after {} retries", label, retries);
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let failure = classify(&err);
        if !policy.allows(failure) || retries >= config.max_retries {
            if failure == Failure::InDoubt && policy == Policy::Write {
                warn!("{}: connection lost mid-write, not replaying: {}", label, err);
            }
            return Err(err);
        }

        retries += 1;
        let delay = config.backoff(retries);
        warn!(
            "{} failed ({:?}, retry {}/{} in {:?}): {}",
            label, failure, retries, config.max_retries, delay, err
        );
        tokio::time::sleep(delay).await;
    }
}
