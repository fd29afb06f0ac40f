//! Cart quantities and the amounts derived from them.
//!
//! A cart maps item identifiers to quantities. A quantity of zero is kept in
//! the map (so a removed line can be restored by the shopper) but is treated
//! as absent by every derivation except [`Cart::count`], where it adds nothing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogItem};
use crate::types::{CatalogItemId, Price};

/// The shopper's in-progress selection.
///
/// Serializes as a plain `{ "<id>": quantity }` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<CatalogItemId, u32>,
}

/// Result of pricing a cart against a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartAmount {
    /// Sum of `price × quantity` over priced entries.
    pub total: Decimal,
    /// Entries with a positive quantity that the catalog does not contain.
    pub missing: Vec<CatalogItemId>,
}

/// Subtotal, delivery fee and grand total shown on the cart page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

/// A cart entry resolved against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub item: &'a CatalogItem,
    pub quantity: u32,
}

impl CartLine<'_> {
    /// `unit price × quantity`.
    #[must_use]
    pub fn line_price(&self) -> Price {
        Price::new(
            self.item.price * Decimal::from(self.quantity),
            self.item.currency.clone(),
        )
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the quantity for `id`, starting at one. Returns the new quantity.
    pub fn add(&mut self, id: CatalogItemId) -> u32 {
        let quantity = self.items.entry(id).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Set the quantity for `id`. Zero keeps the key with a zero value.
    pub fn set_quantity(&mut self, id: CatalogItemId, quantity: u32) {
        self.items.insert(id, quantity);
    }

    /// Sum of every stored quantity.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.values().map(|&q| u64::from(q)).sum()
    }

    /// Entries with a positive quantity, in identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (&CatalogItemId, u32)> {
        self.items
            .iter()
            .filter(|(_, q)| **q > 0)
            .map(|(id, q)| (id, *q))
    }

    /// Whether no entry has a positive quantity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Price the cart against `catalog`.
    ///
    /// Entries whose item is not in the catalog are left out of the total
    /// and reported in [`CartAmount::missing`].
    #[must_use]
    pub fn amount(&self, catalog: &Catalog) -> CartAmount {
        let mut amount = CartAmount::default();
        for (id, quantity) in self.entries() {
            match catalog.get(id) {
                Some(item) => amount.total += item.price * Decimal::from(quantity),
                None => amount.missing.push(id.clone()),
            }
        }
        amount
    }

    /// Entries resolved against `catalog`, plus the ids that could not be resolved.
    #[must_use]
    pub fn lines<'a>(&self, catalog: &'a Catalog) -> (Vec<CartLine<'a>>, Vec<CatalogItemId>) {
        let mut lines = Vec::new();
        let mut missing = Vec::new();
        for (id, quantity) in self.entries() {
            match catalog.get(id) {
                Some(item) => lines.push(CartLine { item, quantity }),
                None => missing.push(id.clone()),
            }
        }
        (lines, missing)
    }
}

impl CartTotals {
    /// Compute totals from a subtotal and a flat delivery fee.
    ///
    /// An empty subtotal has nothing to deliver, so fee and total are zero.
    #[must_use]
    pub fn new(subtotal: Price, delivery_fee: Decimal) -> Self {
        let currency = subtotal.currency_code.clone();
        let fee = if subtotal.amount.is_zero() {
            Decimal::ZERO
        } else {
            delivery_fee
        };
        let total = subtotal.amount + fee;
        Self {
            subtotal,
            delivery_fee: Price::new(fee, currency.clone()),
            total: Price::new(total, currency),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::item;
    use crate::types::CurrencyCode;

    fn id(s: &str) -> CatalogItemId {
        CatalogItemId::from_gid(s)
    }

    fn catalog_ab() -> Catalog {
        Catalog::new(vec![item("a", "A", 10), item("b", "B", 20)])
    }

    #[test]
    fn test_add_new_item_increments_count_by_one() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 3);
        let before = cart.count();
        assert_eq!(cart.add(id("new")), 1);
        assert_eq!(cart.count(), before + 1);
    }

    #[test]
    fn test_add_existing_item_increments() {
        let mut cart = Cart::new();
        cart.add(id("a"));
        assert_eq!(cart.add(id("a")), 2);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_add_after_zero_restarts_at_one() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 0);
        assert_eq!(cart.add(id("a")), 1);
    }

    #[test]
    fn test_amount_and_count_scenario() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 2);
        cart.set_quantity(id("b"), 1);
        let amount = cart.amount(&catalog_ab());
        assert_eq!(amount.total, Decimal::from(40));
        assert!(amount.missing.is_empty());
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_zero_quantity_contributes_nothing() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 0);
        cart.set_quantity(id("b"), 1);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.amount(&catalog_ab()).total, Decimal::from(20));
    }

    #[test]
    fn test_update_to_zero_removes_contribution() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 2);
        cart.set_quantity(id("b"), 1);
        cart.set_quantity(id("a"), 0);
        assert_eq!(cart.count(), 1);
        assert_eq!(cart.amount(&catalog_ab()).total, Decimal::from(20));
        assert_eq!(cart.entries().count(), 1);
    }

    #[test]
    fn test_amount_skips_missing_items() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 1);
        cart.set_quantity(id("ghost"), 5);
        let amount = cart.amount(&catalog_ab());
        assert_eq!(amount.total, Decimal::from(10));
        assert_eq!(amount.missing, vec![id("ghost")]);
        // Unknown ids still count toward the item count.
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn test_lines_resolve_known_items() {
        let mut cart = Cart::new();
        cart.set_quantity(id("b"), 2);
        cart.set_quantity(id("ghost"), 1);
        cart.set_quantity(id("a"), 0);
        let catalog = catalog_ab();
        let (lines, missing) = cart.lines(&catalog);
        assert_eq!(lines.len(), 1);
        let line = lines.first().unwrap();
        assert_eq!(line.item.title, "B");
        assert_eq!(line.line_price().display(), "$40.00");
        assert_eq!(missing, vec![id("ghost")]);
    }

    #[test]
    fn test_is_empty_ignores_zero_entries() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 0);
        assert!(cart.is_empty());
        cart.add(id("a"));
        assert!(!cart.is_empty());
    }

    #[test]
    fn test_serializes_as_object() {
        let mut cart = Cart::new();
        cart.set_quantity(id("a"), 2);
        assert_eq!(serde_json::to_string(&cart).unwrap(), r#"{"a":2}"#);
        let back: Cart = serde_json::from_str(r#"{"a":2}"#).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_totals_add_delivery_fee() {
        let subtotal = Price::new(Decimal::from(40), CurrencyCode::default());
        let totals = CartTotals::new(subtotal, Decimal::from(10));
        assert_eq!(totals.delivery_fee.amount, Decimal::from(10));
        assert_eq!(totals.total.display(), "$50.00");
    }

    #[test]
    fn test_totals_empty_cart_has_no_fee() {
        let subtotal = Price::new(Decimal::ZERO, CurrencyCode::default());
        let totals = CartTotals::new(subtotal, Decimal::from(10));
        assert!(totals.delivery_fee.amount.is_zero());
        assert!(totals.total.amount.is_zero());
    }
}
