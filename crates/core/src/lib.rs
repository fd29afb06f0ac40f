//! Bazaar Core - Storefront domain library.
//!
//! This crate provides the types and derivations used by the Bazaar components:
//! - `storefront` - Public-facing e-commerce site
//! - `cli` - Command-line tools for catalog inspection and migrations
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no session
//! access, no HTTP clients. Persistence and logging live in the storefront,
//! which calls into these types through its state store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for item identifiers and prices
//! - [`catalog`] - Catalog items and detail resolution
//! - [`cart`] - Cart quantities, amounts and totals
//! - [`orders`] - Append-only order book
//! - [`browse`] - Search, filter, sort, pagination and suggestions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod browse;
pub mod cart;
pub mod catalog;
pub mod orders;
pub mod types;

pub use browse::{
    BrowseState, CatalogFilter, PAGE_SIZE, Page, PricePreset, SUGGESTION_LIMIT, SortMode,
    normalize_search, suggestions,
};
pub use cart::{Cart, CartAmount, CartLine, CartTotals};
pub use catalog::{Catalog, CatalogItem, ItemLookup};
pub use orders::{OrderBook, OrderLine};
pub use types::*;
