//! Application state shared across handlers.

use std::sync::Arc;

use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::registry::StoreRegistry;
use crate::store::ProductStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the catalog, the per-client stores, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    stores: StoreRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `catalog` - Products offered by the shop
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Self {
        let stores = StoreRegistry::new(config.data_dir.clone(), config.store_idle);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                stores,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the client store registry.
    #[must_use]
    pub fn stores(&self) -> &StoreRegistry {
        &self.inner.stores
    }

    /// Shorthand for the store belonging to `client`.
    #[must_use]
    pub fn store_for(&self, client: Uuid) -> Arc<ProductStore> {
        self.inner.stores.store_for(client)
    }
}
