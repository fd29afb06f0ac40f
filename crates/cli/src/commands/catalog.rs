//! Catalog inspection command.

use thiserror::Error;

use bazaar_storefront::config::{ConfigError, MAX_CATALOG_SIZE, ShopifyStorefrontConfig};
use bazaar_storefront::shopify::{ShopifyError, StorefrontClient};

/// Errors raised while printing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Could not encode catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("--first must be between 1 and {max}, got {0}", max = MAX_CATALOG_SIZE)]
    InvalidFirst(i64),
}

/// Fetch the catalog exactly as the storefront would and print it as JSON.
///
/// # Errors
///
/// Returns an error if configuration is missing, `first` is out of range, or
/// the fetch fails.
pub async fn print(first: Option<i64>) -> Result<(), CatalogError> {
    let config = ShopifyStorefrontConfig::from_env()?;
    let first = first.unwrap_or(config.catalog_size);
    if !(1..=MAX_CATALOG_SIZE).contains(&first) {
        return Err(CatalogError::InvalidFirst(first));
    }

    let client = StorefrontClient::new(&config);
    tracing::info!(endpoint = client.endpoint(), first, "Fetching catalog");
    let catalog = client.fetch_catalog(first).await?;
    tracing::info!(items = catalog.len(), "Catalog fetched");

    let json = serde_json::to_string_pretty(&catalog)?;
    #[allow(clippy::print_stdout)]
    {
        println!("{json}");
    }
    Ok(())
}
