//! HTTP server assembly
//!
//! Wires the gateway router with tracing, timeout, compression, and metrics
//! middleware, and serves it with graceful shutdown.

use axum::{middleware, Router};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::metrics;
use crate::routes;
use crate::storage::StorageClient;

/// HTTP server for the gateway
pub struct Server {
    config: Config,
    storage: Arc<dyn StorageClient>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config, storage: Arc<dyn StorageClient>) -> Self {
        Self { config, storage }
    }

    /// Build the router with all middleware
    fn build_router(&self) -> Router {
        routes::create_router(self.storage.clone()).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    self.config.server.timeout_secs,
                )))
                .layer(CompressionLayer::new())
                .layer(middleware::from_fn(metrics::track_requests))
                .into_inner(),
        )
    }

    /// Start the server and run until the shutdown future resolves
    pub async fn start<F>(&self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.config.server.bind_address).await?;
        info!(address = %self.config.server.bind_address, "Server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}
