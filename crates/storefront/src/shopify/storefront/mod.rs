//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` for type-safe queries with `reqwest` 0.13 for HTTP.
//! The storefront only reads the product catalog; carts and orders live in
//! the visitor's session.

mod conversions;
pub mod queries;

use std::sync::Arc;

use graphql_client::{GraphQLQuery, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use bazaar_core::Catalog;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use conversions::convert_catalog;
use queries::{GetCatalog, get_catalog};

/// Header for server-side private access tokens.
const PRIVATE_TOKEN_HEADER: &str = "Shopify-Storefront-Private-Token";
/// Header for public (browser-safe) access tokens.
const PUBLIC_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    auth_header: &'static str,
    access_token: SecretString,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    ///
    /// The private token is preferred when both tokens are configured.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let (auth_header, access_token) = match (
            &config.storefront_private_token,
            &config.storefront_public_token,
        ) {
            (Some(private), _) => (
                PRIVATE_TOKEN_HEADER,
                SecretString::from(private.expose_secret().to_string()),
            ),
            (None, Some(public)) => (PUBLIC_TOKEN_HEADER, SecretString::from(public.clone())),
            (None, None) => (PUBLIC_TOKEN_HEADER, SecretString::from(String::new())),
        };

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                auth_header,
                access_token,
            }),
        }
    }

    /// The GraphQL endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(self.inner.auth_header, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Body as text first for error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %truncate(&response_text, 500),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the first `first` products as a catalog, in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response carries
    /// GraphQL errors.
    #[instrument(skip(self), fields(endpoint = %self.inner.endpoint))]
    pub async fn fetch_catalog(&self, first: i64) -> Result<Catalog, ShopifyError> {
        let data = self
            .execute::<GetCatalog>(get_catalog::Variables { first })
            .await?;
        let catalog = convert_catalog(data);
        debug!(items = catalog.len(), "Catalog fetched");
        Ok(catalog)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn convert_graphql_error(error: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: error.message,
        locations: error.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: error.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(private: Option<&str>, public: Option<&str>) -> ShopifyStorefrontConfig {
        ShopifyStorefrontConfig {
            store: "bazaar-demo.myshopify.com".to_string(),
            api_version: "2025-07".to_string(),
            storefront_public_token: public.map(ToString::to_string),
            storefront_private_token: private.map(|t| SecretString::from(t.to_string())),
            catalog_size: 50,
        }
    }

    #[test]
    fn test_private_token_preferred() {
        let client = StorefrontClient::new(&config(Some("private"), Some("public")));
        assert_eq!(client.inner.auth_header, PRIVATE_TOKEN_HEADER);
        assert_eq!(client.inner.access_token.expose_secret(), "private");
    }

    #[test]
    fn test_public_token_fallback() {
        let client = StorefrontClient::new(&config(None, Some("public")));
        assert_eq!(client.inner.auth_header, PUBLIC_TOKEN_HEADER);
        assert_eq!(client.inner.access_token.expose_secret(), "public");
    }

    #[test]
    fn test_endpoint_from_config() {
        let client = StorefrontClient::new(&config(None, Some("public")));
        assert_eq!(
            client.endpoint(),
            "https://bazaar-demo.myshopify.com/api/2025-07/graphql.json"
        );
    }

    #[test]
    fn test_convert_graphql_error_path() {
        let error: graphql_client::Error = serde_json::from_str(
            r#"{"message":"Throttled","locations":[{"line":2,"column":3}],"path":["products",0]}"#,
        )
        .unwrap();
        let converted = convert_graphql_error(error);
        assert_eq!(converted.message, "Throttled");
        assert_eq!(converted.locations.first().unwrap().line, 2);
        assert_eq!(converted.path.len(), 2);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
    }
}
