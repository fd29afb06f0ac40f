//! Append-only record of checked-out cart snapshots.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::CatalogItemId;

/// One recorded line of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Item identifier.
    pub id: CatalogItemId,
    /// Quantity at checkout time.
    pub quantity: u32,
}

/// Every order line recorded so far, oldest first.
///
/// Lines are never merged or deduplicated: checking out the same cart twice
/// records it twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderBook {
    lines: Vec<OrderLine>,
}

impl OrderBook {
    /// Append one line per cart entry with a positive quantity.
    ///
    /// Returns the number of lines appended.
    pub fn record(&mut self, cart: &Cart) -> usize {
        let before = self.lines.len();
        self.lines.extend(cart.entries().map(|(id, quantity)| OrderLine {
            id: id.clone(),
            quantity,
        }));
        self.lines.len() - before
    }

    /// Recorded lines, oldest first.
    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
