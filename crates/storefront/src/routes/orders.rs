//! Order confirmation route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use bazaar_core::OrderLine;

use crate::filters;
use crate::middleware::Shop;

/// Recorded order line display data for templates.
#[derive(Clone)]
pub struct OrderLineView {
    pub id: String,
    /// Catalog title, `None` when the item is no longer in the catalog.
    pub title: Option<String>,
    pub quantity: u32,
}

/// Order page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/place_order.html")]
pub struct PlaceOrderTemplate {
    pub orders: Vec<OrderLineView>,
}

/// Show every order line recorded in this session, oldest first.
#[instrument(skip(shop))]
pub async fn place_order(Shop(shop): Shop) -> PlaceOrderTemplate {
    let orders = shop
        .orders()
        .lines()
        .iter()
        .map(|OrderLine { id, quantity }| OrderLineView {
            id: id.to_string(),
            title: shop.catalog().get(id).map(|item| item.title.clone()),
            quantity: *quantity,
        })
        .collect();

    PlaceOrderTemplate { orders }
}
