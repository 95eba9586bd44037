//! Per-client product stores.
//!
//! Each browser is identified by a random client id (see
//! [`crate::middleware::client`]). The registry hands out one shared
//! [`ProductStore`] per id, so every request from that client observes the
//! same cart and wishlist.
//!
//! Stores are cached with time-to-idle eviction. With a data directory
//! configured, every store writes through to `<data_dir>/<client-id>/`; an
//! evicted store is rebuilt from those files on the next request.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::storage::{FileStorage, MemoryStorage, Storage};
use crate::store::ProductStore;

/// Upper bound on cached client stores.
const MAX_CACHED_STORES: u64 = 10_000;

/// Shared map from client id to that client's store.
#[derive(Clone)]
pub struct StoreRegistry {
    stores: Cache<Uuid, Arc<ProductStore>>,
    data_dir: Option<PathBuf>,
}

impl StoreRegistry {
    /// Create a registry.
    ///
    /// `data_dir` of `None` keeps every store in memory only.
    #[must_use]
    pub fn new(data_dir: Option<PathBuf>, idle: Duration) -> Self {
        let stores = Cache::builder()
            .max_capacity(MAX_CACHED_STORES)
            .time_to_idle(idle)
            .eviction_listener(|client: Arc<Uuid>, _store, cause| {
                tracing::debug!(%client, ?cause, "Client store evicted");
            })
            .build();

        Self { stores, data_dir }
    }

    /// Get the store for `client`, hydrating it on first use.
    ///
    /// Concurrent first requests for the same client share one hydration.
    #[must_use]
    pub fn store_for(&self, client: Uuid) -> Arc<ProductStore> {
        self.stores.get_with(client, || {
            let storage = self.storage_for(client);
            tracing::debug!(%client, ?storage, "Hydrating client store");
            let store = ProductStore::hydrate(storage);
            store
                .subscribe(move |event| {
                    tracing::debug!(
                        %client,
                        collection = ?event.collection,
                        persisted = event.persisted,
                        "Client store changed"
                    );
                })
                .detach();
            Arc::new(store)
        })
    }

    /// The persistence root, if any.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Number of stores currently cached.
    #[must_use]
    pub fn cached_stores(&self) -> u64 {
        self.stores.run_pending_tasks();
        self.stores.entry_count()
    }

    /// Drop the cached store for `client`. Persisted data is kept.
    pub fn evict(&self, client: Uuid) {
        self.stores.invalidate(&client);
    }

    fn storage_for(&self, client: Uuid) -> Arc<dyn Storage> {
        match &self.data_dir {
            Some(root) => Arc::new(FileStorage::new(root.join(client.to_string()))),
            None => Arc::new(MemoryStorage::new()),
        }
    }
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("cached_stores", &self.stores.entry_count())
            .field("data_dir", &self.data_dir)
            .finish()
    }
}
