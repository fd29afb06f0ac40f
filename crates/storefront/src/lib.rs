//! Bazaar storefront library.
//!
//! Server-rendered storefront over a Shopify catalog. Carts and orders are
//! kept per visitor in their session. The crate is a library so the router
//! can be driven in-process by tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod shop;
pub mod shopify;
pub mod state;
