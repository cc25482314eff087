use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::StaticConfig;
use crate::services::{
    AdminService, AllocationService, AppStartTime, CodeGenerator, HealthService, RedirectService,
    RetentionSweeper,
};
use crate::storage::{SeaOrmStorage, StorageFactory, UrlStore};

/// 所有服务共享同一个存储句柄
pub struct AppServices {
    pub allocation: Arc<AllocationService>,
    pub redirect: Arc<RedirectService>,
    pub admin: Arc<AdminService>,
    pub health: Arc<HealthService>,
    pub sweeper: Arc<RetentionSweeper>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn UrlStore>,
        generator: Arc<CodeGenerator>,
        config: &StaticConfig,
    ) -> crate::errors::Result<Self> {
        Ok(Self {
            allocation: Arc::new(AllocationService::new(
                store.clone(),
                generator,
                config.allocation.clone(),
                config.app.base_url.clone(),
            )),
            redirect: Arc::new(RedirectService::new(store.clone())),
            admin: Arc::new(AdminService::new(
                store.clone(),
                config.app.secret_token.clone(),
                config.app.base_url.clone(),
            )),
            health: Arc::new(HealthService::new(store.clone(), AppStartTime::now())),
            sweeper: Arc::new(RetentionSweeper::new(store, &config.retention)?),
        })
    }
}

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 连接数据库、执行迁移并组装服务
pub async fn prepare_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let store: Arc<dyn UrlStore> = storage.clone();
    let services = AppServices::new(store, Arc::new(CodeGenerator::from_entropy()), config)
        .context("Invalid service configuration")?;

    if config.app.secret_token.is_empty() {
        info!("Delete endpoints are disabled (app.secret_token not set)");
    }

    debug!("Pre-startup completed in {:?}", start_time.elapsed());

    Ok(StartupContext { storage, services })
}
