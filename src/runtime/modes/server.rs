//! Server mode
//!
//! Starts the HTTP server with all routes, plus the retention background task.

use std::time::Duration;

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::cors::validate_cors_config;
use crate::api::{build_cors_middleware, configure_routes, json_config};
use crate::config::StaticConfig;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let startup = lifetime::startup::prepare_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let services = startup.services;
    let allocation = web::Data::from(services.allocation.clone());
    let redirect = web::Data::from(services.redirect.clone());
    let admin = web::Data::from(services.admin.clone());
    let health = web::Data::from(services.health.clone());

    let retention_task = if config.retention.enabled {
        Some(services.sweeper.clone().spawn_background_task(
            Duration::from_secs(config.retention.interval_secs.max(1)),
            Duration::from_secs(config.retention.initial_delay_secs),
        ))
    } else {
        info!("Retention sweep disabled");
        None
    };

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .app_data(allocation.clone())
            .app_data(redirect.clone())
            .app_data(admin.clone())
            .app_data(health.clone())
            .app_data(json_config())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(configure_routes)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count)
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::wait_for_signal() => {
            handle.stop(true).await;
            warn!("Graceful shutdown: HTTP server stopped");
        }
    }

    if let Some(task) = retention_task {
        task.abort();
    }
    lifetime::shutdown::close_database(startup.storage.get_db().clone()).await;

    Ok(())
}
