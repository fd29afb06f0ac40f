//! Catalog browsing: search, category and price filters, sorting, pagination
//! and search suggestions.
//!
//! Every derivation borrows from the catalog and leaves its order untouched.
//! The main filter and the suggestion list share [`normalize_search`].

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::catalog::{Catalog, CatalogItem};

/// Items per catalog page.
pub const PAGE_SIZE: usize = 8;

/// Maximum number of search suggestions.
pub const SUGGESTION_LIMIT: usize = 5;

/// Normalize free-text search input: trim, then lower-case.
#[must_use]
pub fn normalize_search(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn title_matches(item: &CatalogItem, normalized: &str) -> bool {
    item.title.to_lowercase().contains(normalized)
}

// =============================================================================
// Sort Mode
// =============================================================================

/// Catalog ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Catalog order.
    #[default]
    Relevant,
    /// Ascending by price.
    LowHigh,
    /// Descending by price.
    HighLow,
}

impl SortMode {
    /// Parse a sort mode. Anything unrecognized is [`SortMode::Relevant`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "low-high" => Self::LowHigh,
            "high-low" => Self::HighLow,
            _ => Self::Relevant,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevant => "relevant",
            Self::LowHigh => "low-high",
            Self::HighLow => "high-low",
        }
    }
}

// =============================================================================
// Price Presets
// =============================================================================

/// Error returned when parsing an unknown [`PricePreset`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown price preset: {0}")]
pub struct UnknownPreset(pub String);

/// Shortcut price ranges offered next to the price inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricePreset {
    /// Up to 50.
    Under50,
    /// 50 to 100 inclusive.
    From50To100,
    /// 100 and above.
    Above100,
    /// No bounds.
    Clear,
}

impl PricePreset {
    /// The `(min, max)` bounds this preset selects.
    #[must_use]
    pub fn bounds(self) -> (Option<Decimal>, Option<Decimal>) {
        match self {
            Self::Under50 => (None, Some(Decimal::from(50))),
            Self::From50To100 => (Some(Decimal::from(50)), Some(Decimal::from(100))),
            Self::Above100 => (Some(Decimal::from(100)), None),
            Self::Clear => (None, None),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Under50 => "under50",
            Self::From50To100 => "50-100",
            Self::Above100 => "above100",
            Self::Clear => "clear",
        }
    }
}

impl FromStr for PricePreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "under50" => Ok(Self::Under50),
            "50-100" => Ok(Self::From50To100),
            "above100" => Ok(Self::Above100),
            "clear" => Ok(Self::Clear),
            other => Err(UnknownPreset(other.to_string())),
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Filter and sort inputs for the catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Raw search text as typed.
    pub search: String,
    /// Selected categories; empty means any category.
    pub categories: BTreeSet<String>,
    /// Inclusive lower price bound (defaults to zero).
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound (defaults to unbounded).
    pub max_price: Option<Decimal>,
    pub sort: SortMode,
}

impl CatalogFilter {
    /// Whether `item` passes the search, category and price predicates.
    ///
    /// The predicates are independent, so their order does not matter.
    #[must_use]
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.matches_search(item) && self.matches_category(item) && self.matches_price(item)
    }

    fn matches_search(&self, item: &CatalogItem) -> bool {
        let query = normalize_search(&self.search);
        query.is_empty() || title_matches(item, &query)
    }

    fn matches_category(&self, item: &CatalogItem) -> bool {
        self.categories.is_empty()
            || item
                .category
                .as_ref()
                .is_some_and(|c| self.categories.contains(c))
    }

    fn matches_price(&self, item: &CatalogItem) -> bool {
        let min = self.min_price.unwrap_or(Decimal::ZERO);
        item.price >= min && self.max_price.is_none_or(|max| item.price <= max)
    }

    /// Filter then sort `catalog`.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogItem> {
        let mut items: Vec<&CatalogItem> = catalog
            .items()
            .iter()
            .filter(|item| self.matches(item))
            .collect();

        // `sort_by` is stable, so equal prices keep catalog order.
        match self.sort {
            SortMode::LowHigh => items.sort_by(|a, b| a.price.cmp(&b.price)),
            SortMode::HighLow => items.sort_by(|a, b| b.price.cmp(&a.price)),
            SortMode::Relevant => {}
        }

        items
    }
}

/// Up to [`SUGGESTION_LIMIT`] items whose title matches the search text.
#[must_use]
pub fn suggestions<'a>(catalog: &'a Catalog, raw: &str) -> Vec<&'a CatalogItem> {
    let query = normalize_search(raw);
    if query.is_empty() {
        return Vec::new();
    }
    catalog
        .items()
        .iter()
        .filter(|item| title_matches(item, &query))
        .take(SUGGESTION_LIMIT)
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// One page of a result sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-indexed page number.
    pub number: usize,
    /// Number of pages (zero for an empty sequence).
    pub total_pages: usize,
    /// Length of the whole sequence.
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Cut page `number` (1-indexed, 0 treated as 1) out of `all`.
    ///
    /// A page past the end is empty.
    #[must_use]
    pub fn slice(all: Vec<T>, number: usize) -> Self {
        let number = number.max(1);
        let total_items = all.len();
        let items = all
            .into_iter()
            .skip((number - 1).saturating_mul(PAGE_SIZE))
            .take(PAGE_SIZE)
            .collect();
        Self {
            items,
            number,
            total_pages: total_items.div_ceil(PAGE_SIZE),
            total_items,
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

// =============================================================================
// Browse State
// =============================================================================

/// Transient filter, sort and page state of the catalog view.
///
/// Changing any filter or sort input sends the view back to page one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    filter: CatalogFilter,
    page: usize,
}

impl Default for BrowseState {
    fn default() -> Self {
        Self {
            filter: CatalogFilter::default(),
            page: 1,
        }
    }
}

impl BrowseState {
    #[must_use]
    pub const fn filter(&self) -> &CatalogFilter {
        &self.filter
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    fn changed(&mut self, changed: bool) {
        if changed {
            self.page = 1;
        }
    }

    pub fn set_search(&mut self, search: &str) {
        let changed = self.filter.search != search;
        self.filter.search = search.to_string();
        self.changed(changed);
    }

    /// Add the category if absent, remove it if present.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.filter.categories.remove(category) {
            self.filter.categories.insert(category.to_string());
        }
        self.changed(true);
    }

    pub fn set_min_price(&mut self, min: Option<Decimal>) {
        let changed = self.filter.min_price != min;
        self.filter.min_price = min;
        self.changed(changed);
    }

    pub fn set_max_price(&mut self, max: Option<Decimal>) {
        let changed = self.filter.max_price != max;
        self.filter.max_price = max;
        self.changed(changed);
    }

    /// Replace both price bounds with those of `preset`.
    pub fn apply_preset(&mut self, preset: PricePreset) {
        let (min, max) = preset.bounds();
        self.set_min_price(min);
        self.set_max_price(max);
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        let changed = self.filter.sort != sort;
        self.filter.sort = sort;
        self.changed(changed);
    }

    /// Jump to a page (0 is treated as 1).
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// The current page of filtered, sorted results.
    #[must_use]
    pub fn results<'a>(&self, catalog: &'a Catalog) -> Page<&'a CatalogItem> {
        Page::slice(self.filter.apply(catalog), self.page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::item;

    fn prices(items: &[&CatalogItem]) -> Vec<Decimal> {
        items.iter().map(|i| i.price).collect()
    }

    fn priced_catalog(prices: &[i64]) -> Catalog {
        Catalog::new(
            prices
                .iter()
                .enumerate()
                .map(|(n, p)| item(&format!("p{n}"), &format!("Item {n}"), *p))
                .collect(),
        )
    }

    fn sized_catalog(n: usize) -> Catalog {
        Catalog::new(
            (0..n)
                .map(|i| item(&format!("p{i}"), &format!("Item {i}"), 1))
                .collect(),
        )
    }

    #[test]
    fn test_normalize_search() {
        assert_eq!(normalize_search("  Blue Shirt "), "blue shirt");
        assert_eq!(normalize_search("   "), "");
    }

    #[test]
    fn test_price_bounds_scenario() {
        let catalog = priced_catalog(&[10, 60, 90, 150]);
        let filter = CatalogFilter {
            min_price: Some(Decimal::from(50)),
            max_price: Some(Decimal::from(100)),
            ..CatalogFilter::default()
        };
        let filtered = filter.apply(&catalog);
        assert_eq!(prices(&filtered), vec![Decimal::from(60), Decimal::from(90)]);
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let catalog = priced_catalog(&[50, 100]);
        let filter = CatalogFilter {
            min_price: Some(Decimal::from(50)),
            max_price: Some(Decimal::from(100)),
            ..CatalogFilter::default()
        };
        assert_eq!(filter.apply(&catalog).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let catalog = Catalog::new(vec![
            item("a", "Blue Shirt", 10),
            item("b", "Red Hat", 10),
            item("c", "BLUE jeans", 10),
        ]);
        let filter = CatalogFilter {
            search: "  blue ".to_string(),
            ..CatalogFilter::default()
        };
        let titles: Vec<_> = filter.apply(&catalog).iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Blue Shirt", "BLUE jeans"]);
    }

    #[test]
    fn test_category_filter() {
        let mut shirt = item("a", "Shirt", 10);
        shirt.category = Some("Tops".to_string());
        let mut jeans = item("b", "Jeans", 10);
        jeans.category = Some("Bottoms".to_string());
        let plain = item("c", "Mystery", 10);
        let catalog = Catalog::new(vec![shirt, jeans, plain]);

        let mut filter = CatalogFilter::default();
        assert_eq!(filter.apply(&catalog).len(), 3);

        filter.categories.insert("Tops".to_string());
        let kept = filter.apply(&catalog);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.first().unwrap().title, "Shirt");
    }

    #[test]
    fn test_predicates_commute() {
        let mut a = item("a", "Blue Shirt", 60);
        a.category = Some("Tops".to_string());
        let mut b = item("b", "Blue Hat", 20);
        b.category = Some("Tops".to_string());
        let mut c = item("c", "Red Shirt", 70);
        c.category = Some("Tops".to_string());
        let catalog = Catalog::new(vec![a, b, c]);

        let filter = CatalogFilter {
            search: "blue".to_string(),
            categories: BTreeSet::from(["Tops".to_string()]),
            min_price: Some(Decimal::from(50)),
            ..CatalogFilter::default()
        };

        // Same result when each predicate is applied on its own, in reverse order.
        let manual: Vec<&CatalogItem> = catalog
            .items()
            .iter()
            .filter(|i| filter.matches_price(i))
            .filter(|i| filter.matches_category(i))
            .filter(|i| filter.matches_search(i))
            .collect();
        assert_eq!(filter.apply(&catalog), manual);
        assert_eq!(manual.len(), 1);
    }

    #[test]
    fn test_sort_low_high() {
        let catalog = priced_catalog(&[30, 10, 20, 10]);
        let filter = CatalogFilter {
            sort: SortMode::LowHigh,
            ..CatalogFilter::default()
        };
        let sorted = filter.apply(&catalog);
        assert!(sorted.windows(2).all(|w| w[0].price <= w[1].price));
        // Stable: the two 10s keep catalog order.
        let ids: Vec<_> = sorted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3", "p2", "p0"]);
    }

    #[test]
    fn test_sort_high_low() {
        let catalog = priced_catalog(&[30, 10, 20]);
        let filter = CatalogFilter {
            sort: SortMode::HighLow,
            ..CatalogFilter::default()
        };
        let sorted = filter.apply(&catalog);
        assert!(sorted.windows(2).all(|w| w[0].price >= w[1].price));
    }

    #[test]
    fn test_sort_relevant_preserves_order() {
        let catalog = priced_catalog(&[30, 10, 20]);
        let filtered = CatalogFilter::default().apply(&catalog);
        assert_eq!(
            prices(&filtered),
            vec![Decimal::from(30), Decimal::from(10), Decimal::from(20)]
        );
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!(SortMode::parse("low-high"), SortMode::LowHigh);
        assert_eq!(SortMode::parse("high-low"), SortMode::HighLow);
        assert_eq!(SortMode::parse("relevent"), SortMode::Relevant);
        assert_eq!(SortMode::parse(""), SortMode::Relevant);
    }

    #[test]
    fn test_pagination_windows() {
        let catalog = sized_catalog(19);
        let all = CatalogFilter::default().apply(&catalog);

        let first = Page::slice(all.clone(), 1);
        assert_eq!(first.items.len(), 8);
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let second = Page::slice(all.clone(), 2);
        assert_eq!(second.items.first().unwrap().id.as_str(), "p8");

        let last = Page::slice(all.clone(), 3);
        assert_eq!(last.items.len(), 3);
        assert!(!last.has_next());

        let beyond = Page::slice(all, 4);
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn test_pagination_page_zero_is_first() {
        let page = Page::slice(vec![1, 2, 3], 0);
        assert_eq!(page.number, 1);
        assert_eq!(page.items, vec![1, 2, 3]);
    }

    #[test]
    fn test_pagination_empty() {
        let page: Page<u8> = Page::slice(Vec::new(), 1);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_suggestions_limit_and_normalization() {
        let catalog = Catalog::new(
            (0..7)
                .map(|i| item(&format!("s{i}"), &format!("Sock {i}"), 5))
                .collect(),
        );
        assert_eq!(suggestions(&catalog, "  SOCK ").len(), SUGGESTION_LIMIT);
        assert!(suggestions(&catalog, "   ").is_empty());
        assert!(suggestions(&catalog, "hat").is_empty());
    }

    #[test]
    fn test_browse_state_resets_page_on_change() {
        let mut state = BrowseState::default();
        state.set_page(3);
        state.set_search("shirt");
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.set_sort(SortMode::HighLow);
        assert_eq!(state.page(), 1);

        state.set_page(2);
        state.toggle_category("Tops");
        assert_eq!(state.page(), 1);
        assert!(state.filter().categories.contains("Tops"));
        state.toggle_category("Tops");
        assert!(state.filter().categories.is_empty());
    }

    #[test]
    fn test_browse_state_keeps_page_when_unchanged() {
        let mut state = BrowseState::default();
        state.set_search("shirt");
        state.set_page(2);
        state.set_search("shirt");
        state.set_sort(SortMode::Relevant);
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_apply_preset() {
        let mut state = BrowseState::default();
        state.apply_preset(PricePreset::From50To100);
        assert_eq!(state.filter().min_price, Some(Decimal::from(50)));
        assert_eq!(state.filter().max_price, Some(Decimal::from(100)));

        state.apply_preset(PricePreset::Clear);
        assert_eq!(state.filter().min_price, None);
        assert_eq!(state.filter().max_price, None);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("under50".parse(), Ok(PricePreset::Under50));
        assert_eq!("above100".parse(), Ok(PricePreset::Above100));
        assert!("cheap".parse::<PricePreset>().is_err());
    }

    #[test]
    fn test_results_combines_filter_and_page() {
        let catalog = priced_catalog(&[5, 15, 25, 35, 45, 55, 65, 75, 85, 95]);
        let mut state = BrowseState::default();
        state.set_sort(SortMode::HighLow);
        state.set_page(2);
        let page = state.results(&catalog);
        assert_eq!(page.total_items, 10);
        assert_eq!(prices(&page.items), vec![Decimal::from(15), Decimal::from(5)]);
    }
}
