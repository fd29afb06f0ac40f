//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Collection (same as /collection)
//! GET  /health                  - Liveness
//! GET  /health/ready            - Readiness
//!
//! # Catalog
//! GET  /collection              - Filtered, sorted, paginated catalog
//! GET  /collection/suggestions  - Search suggestions fragment (HTMX)
//! GET  /product/{id}            - Item detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add one unit (returns count badge, triggers cart-updated)
//! POST /cart/update             - Set quantity (returns cart_items fragment)
//! POST /cart/remove             - Set quantity to zero (returns cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! POST /cart/checkout           - Record the cart as an order, redirect to /place-order
//! GET  /place-order             - Recorded orders
//! ```

pub mod cart;
pub mod collection;
pub mod health;
pub mod orders;
pub mod product;

use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Directory served under `/static`, relative to the workspace root.
const STATIC_DIR: &str = "crates/storefront/static";

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collection::index))
        .route("/suggestions", get(collection::suggest))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/checkout", post(cart::checkout))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collection::index))
        .nest("/collection", collection_routes())
        .route("/product/{id}", get(product::show))
        .nest("/cart", cart_routes())
        .route("/place-order", get(orders::place_order))
}

/// Build the complete application: routes, health checks, static files and
/// the middleware stack.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
