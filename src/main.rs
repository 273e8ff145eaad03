//! Small File Server
//!
//! Serves small files (credentials, certificates, configuration fragments)
//! registered with the cluster to nodes that hold the cluster token.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::auth::{ClusterTokenProvider, NodeManager};
use crate::config::{Config, LoggingConfig};
use crate::storage::{SmallFileLookup, SmallFileRegistry};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of the current cluster token.
    pub tokens: Arc<dyn ClusterTokenProvider>,
    /// Small file lookup.
    pub files: Arc<dyn SmallFileLookup>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            logging::init(&LoggingConfig::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };

    logging::init(&config.logging);

    tracing::info!("Starting Small File Server v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        max_file_size_bytes = config.registry.max_file_size_bytes,
        max_file_count = config.registry.max_file_count,
        configured_files = config.registry.files.len(),
        "Configuration loaded"
    );

    let node_manager = NodeManager::from_config(config.cluster.token.clone());

    let registry = SmallFileRegistry::new(config.registry.limits());
    let loaded = registry
        .load_configured(&config.registry.files)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to register configured small files");
            anyhow::anyhow!("Small file registration error: {}", e)
        })?;

    tracing::info!(
        loaded,
        registered = registry.len(),
        "Small file registry ready"
    );

    let state = AppState {
        tokens: Arc::new(node_manager),
        files: Arc::new(registry),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
