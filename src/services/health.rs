use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, trace};

use crate::storage::UrlStore;

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageCheck {
    pub status: &'static str,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub storage: StorageCheck,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: String,
    /// 运行秒数
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u128,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

pub struct HealthService {
    store: Arc<dyn UrlStore>,
    started: AppStartTime,
}

impl HealthService {
    pub fn new(store: Arc<dyn UrlStore>, started: AppStartTime) -> Self {
        Self { store, started }
    }

    pub async fn check(&self) -> HealthReport {
        let start_time = Instant::now();
        let backend = self.store.backend_name().to_string();

        let storage = match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, self.store.count()).await
        {
            Ok(Ok(records)) => {
                trace!("Storage health check passed, {} records", records);
                StorageCheck {
                    status: "healthy",
                    backend,
                    records: Some(records),
                    error: None,
                }
            }
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                StorageCheck {
                    status: "unhealthy",
                    backend,
                    records: None,
                    error: Some(e.error_type().to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                StorageCheck {
                    status: "unhealthy",
                    backend,
                    records: None,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = Utc::now();
        let uptime = (now - self.started.start_datetime).num_seconds().max(0) as u64;

        HealthReport {
            status: storage.status,
            timestamp: now.to_rfc3339(),
            uptime,
            checks: HealthChecks { storage },
            response_time_ms: start_time.elapsed().as_millis(),
        }
    }
}
