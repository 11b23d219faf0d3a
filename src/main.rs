//! s3-gateway - a versioned REST facade in front of Amazon S3
//!
//! Exposes bucket enumeration, bucket-content listing, bucket create/delete,
//! and local-file upload under /v1/aws/s3, with a uniform JSON error body
//! and an OpenAPI description at /api-docs/openapi.json.

mod api;
mod config;
mod errors;
mod metrics;
mod routes;
mod server;
mod storage;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment and optional config file
    let config = Config::from_env().context("loading configuration")?;

    // Initialize tracing with JSON output for structured logging; RUST_LOG
    // wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Initialize Prometheus metrics
    crate::metrics::init_metrics();

    info!("Starting s3-gateway");
    info!(?config, "Configuration loaded");

    // Initialize the storage client; credentials come from the SDK's
    // default provider chain
    let storage = storage::create_client(&config.storage)
        .await
        .context("initializing storage client")?;
    info!(region = %config.storage.region, "Storage client initialized");

    // Create and start the HTTP server
    let server = Server::new(config.clone(), storage);

    // Handle graceful shutdown
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal");
    };

    info!("Server starting on {}", config.server.bind_address);
    if let Err(e) = server.start(shutdown_signal).await {
        error!(error = %e, "Server error");
        return Err(e);
    }

    info!("Server shutdown complete");
    Ok(())
}
