//! Integration test harness for the Bazaar storefront.
//!
//! Drives the full router (sessions, middleware, templates) in-process with
//! `tower::ServiceExt::oneshot`. Sessions live in a `MemoryStore`, and each
//! [`TestApp`] carries its visitor's session cookie between requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode, header};
use rust_decimal::Decimal;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use bazaar_core::{Catalog, CatalogItem, CatalogItemId, CurrencyCode};
use bazaar_storefront::catalog::CatalogHandle;
use bazaar_storefront::config::{ShopConfig, ShopifyStorefrontConfig, StorefrontConfig};
use bazaar_storefront::middleware::create_session_layer;
use bazaar_storefront::routes;
use bazaar_storefront::state::AppState;

/// Build a catalog item priced in whole dollars.
#[must_use]
pub fn item(id: &str, title: &str, price: i64, category: Option<&str>) -> CatalogItem {
    CatalogItem {
        id: CatalogItemId::from_gid(id),
        title: title.to_string(),
        description: format!("{title} description"),
        image_url: format!("https://cdn.example.test/{id}.jpg"),
        price: Decimal::from(price),
        currency: CurrencyCode::default(),
        category: category.map(ToString::to_string),
    }
}

/// Configuration for tests: no database, no Sentry, plain HTTP.
#[must_use]
pub fn test_config(shop: ShopConfig) -> StorefrontConfig {
    StorefrontConfig {
        database_url: None,
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        shopify: ShopifyStorefrontConfig {
            store: "bazaar-test.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            storefront_public_token: Some("public-test-token".to_string()),
            storefront_private_token: None,
            catalog_size: 50,
        },
        shop,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a header as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The storefront router plus one visitor's session cookie.
pub struct TestApp {
    router: Router,
    state: AppState,
    cookie: Option<String>,
}

impl TestApp {
    /// App with a ready catalog and default shop settings.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_shop_config(catalog, ShopConfig::default())
    }

    /// App with a ready catalog and custom shop settings.
    #[must_use]
    pub fn with_shop_config(catalog: Catalog, shop: ShopConfig) -> Self {
        Self::build(CatalogHandle::ready(catalog), shop)
    }

    /// App whose catalog never finishes loading.
    #[must_use]
    pub fn loading() -> Self {
        Self::build(CatalogHandle::new(), ShopConfig::default())
    }

    fn build(catalog: CatalogHandle, shop: ShopConfig) -> Self {
        let config = test_config(shop);
        let state = AppState::with_catalog(config.clone(), None, catalog);
        let session_layer = create_session_layer(MemoryStore::default(), &config);
        Self {
            router: routes::app(state.clone(), session_layer),
            state,
            cookie: None,
        }
    }

    /// The application state behind the router.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// A second visitor on the same server, starting without a session.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            state: self.state.clone(),
            cookie: None,
        }
    }

    /// Send a GET request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = Request::get(uri)
            .body(Body::empty())
            .expect("valid GET request");
        self.send(request).await
    }

    /// Send a form-encoded POST request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid POST request");
        self.send(request).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                HeaderValue::from_str(cookie).expect("valid cookie header"),
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|never| match never {});

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.trim().to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
