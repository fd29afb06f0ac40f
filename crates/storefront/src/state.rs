//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::catalog::{CatalogHandle, fetch_catalog_async};
use crate::config::StorefrontConfig;
use crate::shopify::StorefrontClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, the Shopify client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: Option<PgPool>,
    storefront: StorefrontClient,
    catalog: CatalogHandle,
}

impl AppState {
    /// Create a new application state with the catalog still loading.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` pool backing the session store, if configured
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: Option<PgPool>) -> Self {
        Self::with_catalog(config, pool, CatalogHandle::new())
    }

    /// Create application state around an existing catalog handle.
    #[must_use]
    pub fn with_catalog(
        config: StorefrontConfig,
        pool: Option<PgPool>,
        catalog: CatalogHandle,
    ) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                storefront,
                catalog,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the session database pool, if one is configured.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Get a reference to the shared catalog.
    #[must_use]
    pub fn catalog(&self) -> &CatalogHandle {
        &self.inner.catalog
    }

    /// Start the background catalog fetch.
    pub fn start_catalog_fetch(&self) {
        fetch_catalog_async(
            self.inner.catalog.clone(),
            self.inner.storefront.clone(),
            self.inner.config.shopify.catalog_size,
        );
    }
}
