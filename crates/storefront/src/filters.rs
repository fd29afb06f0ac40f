//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a unit count as "1 item" / "3 items".
///
/// Usage in templates: `{{ cart.item_count|units }}`
#[askama::filter_fn]
pub fn units(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(counted(&count, "item", "items"))
}

/// Formats a result count as "1 product" / "8 products".
///
/// Usage in templates: `{{ total_items|products }}`
#[askama::filter_fn]
pub fn products(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(counted(&count, "product", "products"))
}

fn counted(count: &impl Display, singular: &str, plural: &str) -> String {
    let count = count.to_string();
    let noun = if count == "1" { singular } else { plural };
    format!("{count} {noun}")
}
