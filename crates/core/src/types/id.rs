//! Catalog item identifiers.
//!
//! Shopify identifies products by global IDs such as
//! `gid://shopify/Product/7982301`. The storefront only needs the trailing
//! segment, which is what appears in URLs and in stored carts.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted identifier length.
const MAX_LENGTH: usize = 255;

/// Errors that can occur when parsing a [`CatalogItemId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemIdError {
    /// The input string is empty or whitespace.
    #[error("item id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("item id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Identifier of a catalog item.
///
/// The identifier is not checked against the catalog: a cart may hold ids
/// the current catalog does not contain.
///
/// ```
/// use bazaar_core::CatalogItemId;
///
/// let id = CatalogItemId::from_gid("gid://shopify/Product/42");
/// assert_eq!(id.as_str(), "42");
///
/// assert!(CatalogItemId::parse("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogItemId(String);

impl CatalogItemId {
    /// Parse an identifier from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ItemIdError`] if the input is empty or too long.
    pub fn parse(input: &str) -> Result<Self, ItemIdError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ItemIdError::Empty);
        }
        if trimmed.len() > MAX_LENGTH {
            return Err(ItemIdError::TooLong { max: MAX_LENGTH });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build an identifier from a Shopify global ID, keeping the last path segment.
    #[must_use]
    pub fn from_gid(gid: &str) -> Self {
        let tail = gid.rsplit('/').next().unwrap_or(gid);
        Self(tail.to_string())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CatalogItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
