//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Quantities are kept in the visitor's session through [`Shop`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use bazaar_core::{CartLine, CartTotals, CatalogItemId};

use crate::error::{AppError, add_breadcrumb};
use crate::filters;
use crate::middleware::Shop;
use crate::shop::ShopStore;
use crate::state::AppState;

/// HTMX event fired whenever the cart changes.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartLine<'_>> for CartItemView {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            id: line.item.id.to_string(),
            title: line.item.title.clone(),
            image_url: line.item.image_url.clone(),
            quantity: line.quantity,
            price: line.item.unit_price().display(),
            line_price: line.line_price().display(),
        }
    }
}

/// Cart display data for templates.
///
/// While the catalog is loading, lines cannot be resolved and the view
/// shows a loading state instead of an empty cart.
#[derive(Clone)]
pub struct CartView {
    pub loading: bool,
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
    pub item_count: u64,
}

impl CartView {
    fn new(shop: &ShopStore<Session>, state: &AppState) -> Self {
        let CartTotals {
            subtotal,
            delivery_fee,
            total,
        } = shop.cart_totals();

        Self {
            loading: state.catalog().snapshot().is_none(),
            items: shop.line_items().iter().map(CartItemView::from).collect(),
            subtotal: subtotal.display(),
            delivery_fee: delivery_fee.display(),
            total: total.display(),
            item_count: shop.cart_count(),
        }
    }
}

/// Form carrying only an item id.
#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub id: String,
}

/// Update cart form data.
///
/// `quantity` is parsed by hand so malformed input is a 400.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

fn parse_id(raw: &str) -> Result<CatalogItemId, AppError> {
    CatalogItemId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_quantity(raw: &str) -> Result<u32, AppError> {
    raw.trim().parse::<u32>().map_err(|_| {
        AppError::BadRequest("quantity must be a non-negative integer".to_string())
    })
}

/// Display cart page.
#[instrument(skip(state, shop))]
pub async fn show(State(state): State<AppState>, Shop(shop): Shop) -> CartShowTemplate {
    CartShowTemplate {
        cart: CartView::new(&shop, &state),
    }
}

/// Add one unit of an item (HTMX).
///
/// Returns the cart count badge and triggers `cart-updated`.
#[instrument(skip(shop))]
pub async fn add(Shop(mut shop): Shop, Form(form): Form<ItemForm>) -> Result<Response, AppError> {
    let id = parse_id(&form.id)?;
    add_breadcrumb("cart", "Added item", Some(&[("item_id", id.as_str())]));

    shop.add_to_cart(id).await?;

    Ok((
        AppendHeaders([CART_UPDATED]),
        CartCountTemplate {
            count: shop.cart_count(),
        },
    )
        .into_response())
}

/// Set an item's quantity (HTMX).
#[instrument(skip(state, shop))]
pub async fn update(
    State(state): State<AppState>,
    Shop(mut shop): Shop,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&form.id)?;
    let quantity = parse_quantity(&form.quantity)?;

    shop.update_quantity(id, quantity).await?;

    Ok((
        AppendHeaders([CART_UPDATED]),
        CartItemsTemplate {
            cart: CartView::new(&shop, &state),
        },
    )
        .into_response())
}

/// Remove an item by setting its quantity to zero (HTMX).
#[instrument(skip(state, shop))]
pub async fn remove(
    State(state): State<AppState>,
    Shop(mut shop): Shop,
    Form(form): Form<ItemForm>,
) -> Result<Response, AppError> {
    let id = parse_id(&form.id)?;
    add_breadcrumb("cart", "Removed item", Some(&[("item_id", id.as_str())]));

    shop.update_quantity(id, 0).await?;

    Ok((
        AppendHeaders([CART_UPDATED]),
        CartItemsTemplate {
            cart: CartView::new(&shop, &state),
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(shop))]
pub async fn count(Shop(shop): Shop) -> CartCountTemplate {
    CartCountTemplate {
        count: shop.cart_count(),
    }
}

/// Record the cart as an order, then show the order page.
#[instrument(skip(shop))]
pub async fn checkout(Shop(mut shop): Shop) -> Result<Redirect, AppError> {
    let recorded = shop.add_order().await?;
    add_breadcrumb(
        "checkout",
        "Placed order",
        Some(&[("lines", &recorded.to_string())]),
    );
    Ok(Redirect::to("/place-order"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3").unwrap(), 3);
        assert_eq!(parse_quantity(" 0 ").unwrap(), 0);
        assert!(matches!(parse_quantity("-1"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_quantity("two"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_parse_id_rejects_blank() {
        assert!(matches!(parse_id("   "), Err(AppError::BadRequest(_))));
        assert_eq!(parse_id("42").unwrap().as_str(), "42");
    }
}
