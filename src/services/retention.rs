//! 未使用链接清理任务
//!
//! 删除从未被点击、且创建时间早于保留窗口的记录。分批执行，避免长事务。

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::RetentionConfig;
use crate::errors::{Result, TinyUrlError};
use crate::storage::UrlStore;

/// 防止无限循环
const MAX_ITERATIONS: u32 = 1000;
const BATCH_PAUSE: StdDuration = StdDuration::from_millis(100);

/// 清理报告
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// 实际删除的记录数
    pub deleted: u64,
    /// 扫描时符合条件、删除前被点击而保留的记录数
    pub spared: u64,
}

pub struct RetentionSweeper {
    store: Arc<dyn UrlStore>,
    window: Duration,
    batch_size: u64,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn UrlStore>, config: &RetentionConfig) -> Result<Self> {
        let window = i64::try_from(config.window_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| {
                TinyUrlError::configuration(format!(
                    "retention.window_hours is out of range: {}",
                    config.window_hours
                ))
            })?;

        Ok(Self {
            store,
            window,
            batch_size: config.batch_size.max(1),
        })
    }

    pub async fn run(&self) -> Result<SweepReport> {
        self.sweep_at(Utc::now()).await
    }

    /// Sweep as if the current time were `now`.
    pub async fn sweep_at(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        // 窗口超出可表示的时间范围时，没有记录足够旧
        let cutoff = now
            .checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let mut report = SweepReport::default();
        let mut iterations = 0;

        loop {
            if iterations >= MAX_ITERATIONS {
                warn!(
                    "Retention sweep reached max iterations {} (deleted {} rows)",
                    MAX_ITERATIONS, report.deleted
                );
                break;
            }

            let ids = self
                .store
                .find_unused_before(cutoff, self.batch_size)
                .await?;
            if ids.is_empty() {
                break;
            }

            // DELETE 会重新检查 clicks = 0，扫描后被点击的记录不会被删
            let deleted = self.store.delete_unused(&ids, cutoff).await?;
            let spared = (ids.len() as u64).saturating_sub(deleted);
            if spared > 0 {
                info!(
                    "Retention sweep: {} records were clicked during the sweep and kept",
                    spared
                );
            }

            report.deleted += deleted;
            report.spared += spared;
            iterations += 1;

            debug!(
                "Retention sweep batch {}: deleted {} rows (total {})",
                iterations, deleted, report.deleted
            );

            if (ids.len() as u64) < self.batch_size {
                break;
            }

            tokio::time::sleep(BATCH_PAUSE).await;
        }

        info!(
            "Retention sweep completed: deleted {}, spared {} (cutoff {})",
            report.deleted,
            report.spared,
            cutoff.to_rfc3339()
        );

        Ok(report)
    }

    /// 启动后台清理任务
    ///
    /// 首次运行前等待 `initial_delay`，之后每隔 `interval` 运行一次；失败只记录日志
    pub fn spawn_background_task(
        self: Arc<Self>,
        interval: StdDuration,
        initial_delay: StdDuration,
    ) -> JoinHandle<()> {
        info!(
            "Retention background task started (interval: {}s, first run in {}s)",
            interval.as_secs(),
            initial_delay.as_secs()
        );

        tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;

            loop {
                if let Err(e) = self.run().await {
                    error!("Retention sweep failed: {}", e);
                }

                tokio::time::sleep(interval).await;
            }
        })
    }
}
