//! Extractor for the visitor's shop state.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::shop::ShopStore;
use crate::state::AppState;

/// The visitor's cart and orders, loaded from their session.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Shop(mut shop): Shop) -> Result<String, AppError> {
///     shop.add_to_cart(id).await?;
///     Ok(shop.cart_count().to_string())
/// }
/// ```
pub struct Shop(pub ShopStore<Session>);

impl FromRequestParts<AppState> for Shop {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let store = ShopStore::load(
            session,
            state.catalog().current(),
            state.config().shop.clone(),
        )
        .await;

        Ok(Self(store))
    }
}
