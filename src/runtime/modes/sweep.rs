//! One-shot retention sweep
//!
//! Meant for an external scheduler (cron, a cloud timer) instead of the
//! in-process background task.

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::services::SweepReport;

pub async fn run_sweep(config: &StaticConfig) -> Result<SweepReport> {
    let startup = lifetime::startup::prepare_startup(config).await?;

    let report = startup
        .services
        .sweeper
        .run()
        .await
        .context("Retention sweep failed")?;

    println!(
        "{} deleted {} unused URLs ({} spared, window {}h)",
        "Sweep finished:".green().bold(),
        report.deleted,
        report.spared,
        config.retention.window_hours
    );

    lifetime::shutdown::close_database(startup.storage.get_db().clone()).await;

    Ok(report)
}
