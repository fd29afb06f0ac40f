//! Per-visitor cart and order state.
//!
//! [`ShopStore`] loads the visitor's cart and orders from durable storage,
//! applies mutations, and writes each changed piece back immediately. It is
//! built per request (see [`crate::middleware::Shop`]) around the shared
//! catalog snapshot.

mod storage;

pub use storage::{DurableStorage, MemoryStorage, StorageError};

use std::sync::Arc;

use bazaar_core::{Cart, CartLine, CartTotals, Catalog, CatalogItemId, OrderBook, Price};
use tracing::{instrument, warn};

use crate::config::{CheckoutCartPolicy, ShopConfig};

/// Durable storage keys.
pub mod keys {
    /// Cart quantities, `{ "<id>": quantity }`.
    pub const CART_ITEMS: &str = "cartItems";

    /// Recorded order lines, `[{ "id": .., "quantity": .. }]`.
    pub const ORDERS: &str = "orders";
}

/// Cart and orders for one visitor, backed by `S`.
pub struct ShopStore<S> {
    storage: S,
    catalog: Arc<Catalog>,
    config: ShopConfig,
    cart: Cart,
    orders: OrderBook,
}

impl<S: DurableStorage> ShopStore<S> {
    /// Load state from `storage`.
    ///
    /// Unreadable state is logged and replaced by an empty cart or order list.
    pub async fn load(storage: S, catalog: Arc<Catalog>, config: ShopConfig) -> Self {
        let cart = load_or_default::<Cart, _>(&storage, keys::CART_ITEMS).await;
        let orders = load_or_default::<OrderBook, _>(&storage, keys::ORDERS).await;
        Self {
            storage,
            catalog,
            config,
            cart,
            orders,
        }
    }

    /// The catalog this store prices against.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Orders recorded so far.
    #[must_use]
    pub const fn orders(&self) -> &OrderBook {
        &self.orders
    }

    /// Add one unit of `id`. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self, id), fields(item_id = %id))]
    pub async fn add_to_cart(&mut self, id: CatalogItemId) -> Result<u32, StorageError> {
        if self.catalog.get(&id).is_none() {
            warn!("Adding an item that is not in the catalog");
        }
        let quantity = self.cart.add(id);
        self.save_cart().await?;
        Ok(quantity)
    }

    /// Set the quantity of `id`, including zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be persisted.
    #[instrument(skip(self, id), fields(item_id = %id))]
    pub async fn update_quantity(
        &mut self,
        id: CatalogItemId,
        quantity: u32,
    ) -> Result<(), StorageError> {
        self.cart.set_quantity(id, quantity);
        self.save_cart().await
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.cart.count()
    }

    /// Price of the cart against the current catalog.
    ///
    /// Entries missing from the catalog are skipped with a warning.
    #[must_use]
    pub fn cart_amount(&self) -> Price {
        let amount = self.cart.amount(&self.catalog);
        for id in &amount.missing {
            warn!(item_id = %id, "Cart item not found in catalog");
        }
        Price::new(amount.total, self.catalog.currency())
    }

    /// Subtotal, delivery fee and total.
    #[must_use]
    pub fn cart_totals(&self) -> CartTotals {
        CartTotals::new(self.cart_amount(), self.config.delivery_fee)
    }

    /// Cart entries resolved against the catalog.
    ///
    /// Entries missing from the catalog are skipped with a warning.
    #[must_use]
    pub fn line_items(&self) -> Vec<CartLine<'_>> {
        let (lines, missing) = self.cart.lines(&self.catalog);
        for id in &missing {
            warn!(item_id = %id, "Cart item not found in catalog");
        }
        lines
    }

    /// Record the cart as orders, then apply the checkout cart policy.
    ///
    /// Returns the number of order lines recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the orders or the cleared cart cannot be persisted.
    #[instrument(skip(self))]
    pub async fn add_order(&mut self) -> Result<usize, StorageError> {
        let recorded = self.orders.record(&self.cart);
        self.storage.store(keys::ORDERS, &self.orders).await?;

        if self.config.checkout_cart_policy == CheckoutCartPolicy::Clear {
            self.cart.clear();
            self.save_cart().await?;
        }

        tracing::info!(lines = recorded, total_lines = self.orders.len(), "Order recorded");
        Ok(recorded)
    }

    async fn save_cart(&self) -> Result<(), StorageError> {
        self.storage.store(keys::CART_ITEMS, &self.cart).await
    }
}

async fn load_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: serde::de::DeserializeOwned + Default + Send,
    S: DurableStorage,
{
    match storage.load::<T>(key).await {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to load stored state, starting empty");
            T::default()
        }
    }
}
