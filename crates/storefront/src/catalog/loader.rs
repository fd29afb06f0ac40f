//! Background catalog fetch at startup.

use tracing::{error, info};

use crate::shopify::StorefrontClient;

use super::CatalogHandle;

/// Spawn the one-shot catalog fetch.
///
/// There is no retry: a failure is logged and the handle settles on an
/// empty catalog.
pub fn fetch_catalog_async(handle: CatalogHandle, storefront: StorefrontClient, first: i64) {
    info!(first, "Spawning background catalog fetch task");
    tokio::spawn(async move {
        match storefront.fetch_catalog(first).await {
            Ok(catalog) => {
                let items = catalog.len();
                handle.set_ready(catalog);
                info!(items, "Catalog is now ready and serving requests");
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch catalog, continuing with an empty catalog");
                handle.set_failed();
            }
        }
    });
}
