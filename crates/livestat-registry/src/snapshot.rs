//! Snapshot persistence for the service registry.
//!
//! The registry is persisted as a single JSON object: keys are service IDs,
//! values are `{"status", "lastUpdated"}` bodies. The ID is reconstructed
//! from the object key on load, never stored twice.
//!
//! Persistence is best-effort throughout: a missing file on startup is an
//! empty registry, a corrupt file is logged and the process continues
//! empty, and a failed persist after a mutation leaves the in-memory state
//! as the source of truth until the next successful write.

use livestat_common::{Error, Result, ServiceId};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::types::ServiceRecord;

/// Durable snapshot location for the registry. A no-op when unconfigured.
///
/// Concurrent writers are serialized by the registry's own mutation lock,
/// not by this store; it assumes a single writer per path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: Option<PathBuf>,
}

impl SnapshotStore {
    /// Creates a store writing to `path`, or a disabled store for `None`.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Creates a store with persistence disabled.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Returns true if a snapshot location is configured.
    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Reads the durable snapshot.
    ///
    /// Returns an empty map when no location is configured or the file does
    /// not exist yet. Any other read or parse failure is an error; callers
    /// treat it as "start empty" rather than fatal.
    pub async fn load(&self) -> Result<HashMap<ServiceId, ServiceRecord>> {
        let Some(path) = &self.path else {
            return Ok(HashMap::new());
        };

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No snapshot at {}, starting empty", path.display());
                return Ok(HashMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: HashMap<ServiceId, ServiceRecord> = serde_json::from_str(&content)
            .map_err(|e| Error::persistence(format!("Failed to parse snapshot: {}", e)))?;

        tracing::info!(
            "Loaded snapshot with {} services from {}",
            records.len(),
            path.display()
        );
        Ok(records)
    }

    /// Writes the given full snapshot to the configured location.
    ///
    /// Atomic write: write to a temp sibling, then rename over the
    /// destination. A no-op if no location is configured.
    pub async fn persist(&self, snapshot: &HashMap<ServiceId, ServiceRecord>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Error::persistence(format!("Failed to serialize snapshot: {}", e)))?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, path).await?;

        tracing::debug!(
            "Persisted snapshot with {} services to {}",
            snapshot.len(),
            path.display()
        );
        Ok(())
    }

    /// Dispatches a fire-and-forget persist of the given snapshot.
    ///
    /// Returns immediately; failures are logged and never reach the caller.
    /// Does not spawn at all when persistence is disabled.
    pub fn spawn_persist(&self, snapshot: HashMap<ServiceId, ServiceRecord>) {
        if !self.is_enabled() {
            return;
        }

        let store = self.clone();
        tokio::spawn(async move {
            if let Err(e) = store.persist(&snapshot).await {
                tracing::warn!("Snapshot persist failed: {}", e);
            }
        });
    }
}
