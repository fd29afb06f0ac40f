//! Conversion of catalog query responses into core catalog types.

use bazaar_core::{Catalog, CatalogItem, CatalogItemId, CurrencyCode};
use rust_decimal::Decimal;

use super::queries::get_catalog;

/// Convert a `CurrencyCode` enum to its ISO code.
fn currency_code_to_string(code: get_catalog::CurrencyCode) -> String {
    match code {
        get_catalog::CurrencyCode::Other(code) => code,
        known => format!("{known:?}"),
    }
}

/// Parse a Shopify decimal amount. Unparseable or negative amounts become zero.
fn parse_amount(amount: &str, id: &CatalogItemId) -> Decimal {
    match amount.trim().parse::<Decimal>() {
        Ok(value) if !value.is_sign_negative() => value,
        Ok(_) | Err(_) => {
            tracing::warn!(item_id = %id, amount, "Unusable product price, treating as 0");
            Decimal::ZERO
        }
    }
}

/// Flatten one product node into a catalog item.
///
/// Missing images become an empty URL; a product without variants is priced
/// at zero in USD.
pub fn convert_catalog_item(node: get_catalog::GetCatalogProductsEdgesNode) -> CatalogItem {
    let id = CatalogItemId::from_gid(&node.id);

    let image_url = node
        .images
        .edges
        .into_iter()
        .next()
        .map(|edge| edge.node.url)
        .unwrap_or_default();

    let (price, currency) = node
        .variants
        .edges
        .into_iter()
        .next()
        .map_or((Decimal::ZERO, CurrencyCode::default()), |edge| {
            let money = edge.node.price;
            (
                parse_amount(&money.amount, &id),
                CurrencyCode::new(&currency_code_to_string(money.currency_code)),
            )
        });

    let category = Some(node.product_type.trim().to_string()).filter(|c| !c.is_empty());

    CatalogItem {
        id,
        title: node.title,
        description: node.description,
        image_url,
        price,
        currency,
        category,
    }
}

/// Convert a whole catalog response, keeping source order.
pub fn convert_catalog(data: get_catalog::ResponseData) -> Catalog {
    Catalog::new(
        data.products
            .edges
            .into_iter()
            .map(|edge| convert_catalog_item(edge.node))
            .collect(),
    )
}
