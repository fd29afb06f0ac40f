//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{CatalogItemId, ItemIdError};
pub use price::{CurrencyCode, Price};
