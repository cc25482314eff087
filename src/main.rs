use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use tinyurl::cli::{Cli, Commands, ConfigCommands};
use tinyurl::config::{StaticConfig, get_config, init_config};
use tinyurl::errors::TinyUrlError;
use tinyurl::runtime::modes;
use tinyurl::system::logging::init_logging;

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        match e.downcast_ref::<TinyUrlError>() {
            Some(err) => eprintln!("{}\n  ({:#})", err.format_colored(), e),
            None => eprintln!("{} {:#}", "[ERROR]".red().bold(), e),
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // 生成配置不需要加载现有配置和日志
    if let Some(Commands::Config {
        action: ConfigCommands::Generate { path, force },
    }) = &cli.command
    {
        return generate_config(path.as_deref(), *force);
    }

    init_config(cli.config.as_deref());
    let config = get_config();

    let _guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        None | Some(Commands::Serve) => modes::run_server(&config).await,
        Some(Commands::Sweep) => modes::run_sweep(&config).await.map(|_| ()),
        Some(Commands::Config { .. }) => Ok(()),
    }
}

fn generate_config(path: Option<&str>, force: bool) -> Result<()> {
    let Some(path) = path else {
        println!("{}", StaticConfig::generate_sample_config());
        return Ok(());
    };

    if std::path::Path::new(path).exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path);
    }

    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;
    println!("{} {}", "Config written to".green(), path);
    Ok(())
}
