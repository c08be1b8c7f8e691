//! Status board server.
//!
//! Wires the pieces together: loads the snapshot (best-effort), builds the
//! registry and router, binds TCP, serves.

use livestat_common::Result;
use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::ServerConfig;
use crate::snapshot::SnapshotStore;
use crate::storage::Registry;

/// Live-status board server.
pub struct StatusServer {
    registry: Arc<Registry>,
    config: Arc<ServerConfig>,
    router: Router,
}

impl StatusServer {
    /// Creates a server from the given config, loading the durable
    /// snapshot if one is configured.
    ///
    /// Startup is best-effort: an unreadable or corrupt snapshot is logged
    /// and the server starts with an empty registry. Only the eventual
    /// bind can fail.
    pub async fn new(config: ServerConfig) -> Self {
        let store = SnapshotStore::new(config.snapshot_path.clone());
        let records = match store.load().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load snapshot, starting empty: {}", e);
                HashMap::new()
            }
        };

        let registry = Arc::new(Registry::with_records(records, store));
        let config = Arc::new(config);
        let router = create_router(AppState {
            registry: Arc::clone(&registry),
            config: Arc::clone(&config),
        });

        Self {
            registry,
            config,
            router,
        }
    }

    /// Returns a reference to the registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Binds the configured address and serves until stopped.
    pub async fn run(self) -> Result<()> {
        info!("Binding to {}", self.config.listen_addr);
        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        info!("Server listening on {}", self.config.listen_addr);

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
