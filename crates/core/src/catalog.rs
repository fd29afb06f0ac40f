//! Catalog items and detail resolution.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CatalogItemId, CurrencyCode, Price};

/// A purchasable item as shown in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Item identifier (unique within a catalog).
    pub id: CatalogItemId,
    /// Item title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// First image URL, empty when the item has no image.
    pub image_url: String,
    /// Unit price. Never negative.
    pub price: Decimal,
    /// Currency of `price`.
    pub currency: CurrencyCode,
    /// Category used by the category filter.
    pub category: Option<String>,
}

impl CatalogItem {
    /// The unit price with its currency.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::new(self.price, self.currency.clone())
    }
}

/// The full set of items fetched from the commerce source.
///
/// A catalog is immutable once built; a refetch produces a new catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Create a catalog from items in source order.
    #[must_use]
    pub const fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }

    /// Items in source order.
    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item with the given identifier.
    #[must_use]
    pub fn get(&self, id: &CatalogItemId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Distinct categories, sorted.
    #[must_use]
    pub fn categories(&self) -> BTreeSet<&str> {
        self.items
            .iter()
            .filter_map(|item| item.category.as_deref())
            .collect()
    }

    /// Currency used for aggregate amounts (that of the first item).
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.items
            .first()
            .map(|item| item.currency.clone())
            .unwrap_or_default()
    }
}

/// Outcome of resolving an item for the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemLookup<'a> {
    /// The catalog has not been loaded yet.
    Loading,
    /// The catalog is loaded but has no such item.
    NotFound,
    /// The matching item.
    Found(&'a CatalogItem),
}

impl<'a> ItemLookup<'a> {
    /// Resolve `id` against a catalog that may still be loading.
    #[must_use]
    pub fn resolve(catalog: Option<&'a Catalog>, id: &CatalogItemId) -> Self {
        match catalog {
            None => Self::Loading,
            Some(catalog) => catalog.get(id).map_or(Self::NotFound, Self::Found),
        }
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::item;
    use super::*;

    #[test]
    fn test_get_returns_first_match() {
        let catalog = Catalog::new(vec![
            item("a", "First", 10),
            item("a", "Duplicate", 20),
            item("b", "Other", 30),
        ]);
        let found = catalog.get(&CatalogItemId::from_gid("a")).unwrap();
        assert_eq!(found.title, "First");
    }

    #[test]
    fn test_resolve_loading() {
        let id = CatalogItemId::from_gid("a");
        assert_eq!(ItemLookup::resolve(None, &id), ItemLookup::Loading);
    }

    #[test]
    fn test_resolve_not_found() {
        let catalog = Catalog::new(vec![item("a", "A", 1)]);
        let id = CatalogItemId::from_gid("zzz");
        assert_eq!(ItemLookup::resolve(Some(&catalog), &id), ItemLookup::NotFound);
    }

    #[test]
    fn test_resolve_found() {
        let catalog = Catalog::new(vec![item("a", "A", 1)]);
        let id = CatalogItemId::from_gid("a");
        let ItemLookup::Found(found) = ItemLookup::resolve(Some(&catalog), &id) else {
            panic!("expected item");
        };
        assert_eq!(found.title, "A");
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        let mut shirt = item("a", "Shirt", 10);
        shirt.category = Some("Tops".to_string());
        let mut mug = item("b", "Mug", 5);
        mug.category = Some("Kitchen".to_string());
        let mut tee = item("c", "Tee", 8);
        tee.category = Some("Tops".to_string());
        let catalog = Catalog::new(vec![shirt, mug, tee, item("d", "Note", 1)]);

        let categories: Vec<_> = catalog.categories().into_iter().collect();
        assert_eq!(categories, vec!["Kitchen", "Tops"]);
    }

    #[test]
    fn test_currency_defaults_to_usd() {
        assert_eq!(Catalog::default().currency().code(), "USD");
    }
}
