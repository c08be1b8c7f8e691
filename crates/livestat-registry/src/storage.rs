//! In-memory storage for the service registry.
//!
//! One `tokio::sync::RwLock` guards the whole map: reads (`snapshot`,
//! `full_snapshot`, `len`) share the lock, mutations (`create`, `update`,
//! `delete`) take it exclusively. The lock is held only for map access;
//! the persist copy is captured under the lock and the lock is released
//! before the persist task is spawned, so snapshot I/O never runs while
//! holding it.

use livestat_common::{Error, Result, ServiceId};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::snapshot::SnapshotStore;
use crate::types::ServiceRecord;

/// Thread-safe in-memory service registry.
///
/// Every successful mutation dispatches a fire-and-forget persist of a
/// point-in-time copy of the map. Persist failures are logged and never
/// surface to the caller.
pub struct Registry {
    services: RwLock<HashMap<ServiceId, ServiceRecord>>,
    store: SnapshotStore,
}

impl Registry {
    /// Creates an empty registry backed by the given snapshot store.
    pub fn new(store: SnapshotStore) -> Self {
        Self::with_records(HashMap::new(), store)
    }

    /// Creates a registry pre-populated with records, typically the result
    /// of [`SnapshotStore::load`] at startup.
    pub fn with_records(records: HashMap<ServiceId, ServiceRecord>, store: SnapshotStore) -> Self {
        Self {
            services: RwLock::new(records),
            store,
        }
    }

    /// Registers a new service with an empty status, stamped now.
    ///
    /// Fails with `AlreadyExists` if the ID is present; never overwrites.
    pub async fn create(&self, id: ServiceId) -> Result<()> {
        let snapshot = {
            let mut services = self.services.write().await;
            if services.contains_key(&id) {
                return Err(Error::already_exists(id));
            }
            services.insert(id.clone(), ServiceRecord::new());
            tracing::info!("Registered new service: {}", id);
            services.clone()
        };

        self.store.spawn_persist(snapshot);
        Ok(())
    }

    /// Replaces a service's status verbatim and refreshes its timestamp.
    ///
    /// Fails with `NotFound` if the ID is absent; never creates implicitly.
    pub async fn update(&self, id: &ServiceId, new_status: String) -> Result<()> {
        let snapshot = {
            let mut services = self.services.write().await;
            let record = services
                .get_mut(id)
                .ok_or_else(|| Error::not_found(id.clone()))?;
            record.set_status(new_status);
            tracing::info!("Updated status of service: {}", id);
            services.clone()
        };

        self.store.spawn_persist(snapshot);
        Ok(())
    }

    /// Removes a service from the registry.
    ///
    /// Fails with `NotFound` if the ID is absent.
    pub async fn delete(&self, id: &ServiceId) -> Result<()> {
        let snapshot = {
            let mut services = self.services.write().await;
            services
                .remove(id)
                .ok_or_else(|| Error::not_found(id.clone()))?;
            tracing::info!("Removed service: {}", id);
            services.clone()
        };

        self.store.spawn_persist(snapshot);
        Ok(())
    }

    /// Read-only projection of the requested IDs.
    ///
    /// IDs not present in the registry are silently omitted; this is never
    /// an error.
    pub async fn snapshot(&self, ids: &[ServiceId]) -> HashMap<ServiceId, ServiceRecord> {
        let services = self.services.read().await;
        ids.iter()
            .filter_map(|id| {
                services
                    .get(id)
                    .map(|record| (id.clone(), record.clone()))
            })
            .collect()
    }

    /// Point-in-time copy of every record.
    pub async fn full_snapshot(&self) -> HashMap<ServiceId, ServiceRecord> {
        self.services.read().await.clone()
    }

    /// Returns the number of registered services.
    pub async fn len(&self) -> usize {
        self.services.read().await.len()
    }

    /// Returns true if no services are registered.
    pub async fn is_empty(&self) -> bool {
        self.services.read().await.is_empty()
    }
}
