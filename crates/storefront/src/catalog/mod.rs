//! Shared catalog snapshot.
//!
//! The app starts immediately with the catalog in the `Loading` state. A
//! background task fetches the products from Shopify and swaps the catalog in
//! when done. A failed fetch settles on an empty catalog.

mod loader;

use std::sync::{Arc, PoisonError, RwLock};

use bazaar_core::Catalog;

pub use loader::fetch_catalog_async;

/// Where the startup fetch stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    /// The fetch has not finished yet.
    Loading,
    /// The fetch succeeded.
    Ready,
    /// The fetch failed; the catalog is empty.
    Failed,
}

impl CatalogStatus {
    /// Whether the fetch has finished, successfully or not.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

struct CatalogSlot {
    status: CatalogStatus,
    catalog: Arc<Catalog>,
}

/// Cheaply cloneable handle to the current catalog.
///
/// Readers clone the inner `Arc<Catalog>` and never hold the lock while
/// rendering.
#[derive(Clone)]
pub struct CatalogHandle {
    inner: Arc<RwLock<CatalogSlot>>,
}

impl Default for CatalogHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogHandle {
    /// Create a handle in the `Loading` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(CatalogSlot {
                status: CatalogStatus::Loading,
                catalog: Arc::new(Catalog::default()),
            })),
        }
    }

    /// Create a handle that is already `Ready` with `catalog`.
    #[must_use]
    pub fn ready(catalog: Catalog) -> Self {
        let handle = Self::new();
        handle.set_ready(catalog);
        handle
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> CatalogStatus {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    /// The catalog, or `None` while still loading.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<Catalog>> {
        let slot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        slot.status
            .is_settled()
            .then(|| Arc::clone(&slot.catalog))
    }

    /// The catalog, empty while still loading.
    #[must_use]
    pub fn current(&self) -> Arc<Catalog> {
        let slot = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&slot.catalog)
    }

    /// Swap in a fetched catalog.
    pub fn set_ready(&self, catalog: Catalog) {
        self.settle(CatalogStatus::Ready, catalog);
    }

    /// Settle on an empty catalog after a failed fetch.
    pub fn set_failed(&self) {
        self.settle(CatalogStatus::Failed, Catalog::default());
    }

    fn settle(&self, status: CatalogStatus, catalog: Catalog) {
        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        slot.status = status;
        slot.catalog = Arc::new(catalog);
    }
}
