//! Catalog browsing route handlers.
//!
//! The browse state (search, categories, price bounds, sort, page) travels in
//! the query string, with one `category` pair per selected category. Two extra
//! parameters are transitions applied on top of that state: `toggle` flips one
//! category and `preset` replaces both price bounds. Both send the view back
//! to page one.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, RawQuery, State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use bazaar_core::{BrowseState, PricePreset, SortMode, suggestions};

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

pub use super::product::ItemView;

/// Collection query parameters.
///
/// `category` may repeat, so this is parsed from the raw query string rather
/// than through `Query`. For the other keys the last value wins.
#[derive(Debug, Default)]
pub struct CollectionQuery {
    pub search: Option<String>,
    pub categories: Vec<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub toggle: Option<String>,
    pub preset: Option<String>,
}

impl CollectionQuery {
    /// Parse a URL-encoded query string. Unknown keys are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "search" => query.search = Some(value),
                "category" => query.categories.push(value),
                "min_price" => query.min_price = Some(value),
                "max_price" => query.max_price = Some(value),
                "sort" => query.sort = Some(value),
                "page" => query.page = Some(value),
                "toggle" => query.toggle = Some(value),
                "preset" => query.preset = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Suggestions query parameters.
#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub search: Option<String>,
}

/// A category checkbox in the filter panel.
#[derive(Clone)]
pub struct CategoryOption {
    pub name: String,
    pub selected: bool,
    pub toggle_url: String,
}

/// A sort `<option>`.
#[derive(Clone)]
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// A link with a label.
#[derive(Clone)]
pub struct LinkView {
    pub label: &'static str,
    pub url: String,
}

/// Collection page template.
#[derive(Template, WebTemplate)]
#[template(path = "collection/index.html")]
pub struct CollectionTemplate {
    pub loading: bool,
    pub items: Vec<ItemView>,
    pub search: String,
    pub selected_categories: Vec<String>,
    pub categories: Vec<CategoryOption>,
    pub min_price: String,
    pub max_price: String,
    pub sort_options: Vec<SortOption>,
    pub presets: Vec<LinkView>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

/// Search suggestions fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/suggestions.html")]
pub struct SuggestionsTemplate {
    pub items: Vec<ItemView>,
}

// =============================================================================
// Query Parsing
// =============================================================================

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(name: &str, value: Option<&str>) -> Result<Option<Decimal>, AppError> {
    non_empty(value)
        .map(|v| {
            v.parse::<Decimal>()
                .map_err(|_| AppError::BadRequest(format!("{name} must be a number")))
        })
        .transpose()
}

fn parse_page(value: Option<&str>) -> Result<usize, AppError> {
    non_empty(value).map_or(Ok(1), |v| {
        v.parse::<usize>()
            .map_err(|_| AppError::BadRequest("page must be a positive integer".to_string()))
    })
}

/// Rebuild the browse state described by the query, then apply transitions.
fn browse_state(query: &CollectionQuery) -> Result<BrowseState, AppError> {
    let mut browse = BrowseState::default();

    browse.set_search(query.search.as_deref().unwrap_or_default());

    let selected: std::collections::BTreeSet<&str> = query
        .categories
        .iter()
        .map(String::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    for category in selected {
        browse.toggle_category(category);
    }

    browse.set_min_price(parse_price("min_price", query.min_price.as_deref())?);
    browse.set_max_price(parse_price("max_price", query.max_price.as_deref())?);
    browse.set_sort(SortMode::parse(
        query.sort.as_deref().unwrap_or_default().trim(),
    ));
    browse.set_page(parse_page(query.page.as_deref())?);

    if let Some(category) = non_empty(query.toggle.as_deref()) {
        browse.toggle_category(category);
    }
    if let Some(preset) = non_empty(query.preset.as_deref()) {
        let preset = preset
            .parse::<PricePreset>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        browse.apply_preset(preset);
    }

    Ok(browse)
}

/// Canonical `/collection` URL for a browse state.
fn collection_url(browse: &BrowseState) -> String {
    let filter = browse.filter();
    let mut query = url::form_urlencoded::Serializer::new(String::new());

    if !filter.search.is_empty() {
        query.append_pair("search", &filter.search);
    }
    for category in &filter.categories {
        query.append_pair("category", category);
    }
    if let Some(min) = filter.min_price {
        query.append_pair("min_price", &min.to_string());
    }
    if let Some(max) = filter.max_price {
        query.append_pair("max_price", &max.to_string());
    }
    if filter.sort != SortMode::Relevant {
        query.append_pair("sort", filter.sort.as_str());
    }
    if browse.page() > 1 {
        query.append_pair("page", &browse.page().to_string());
    }

    let query = query.finish();
    if query.is_empty() {
        "/collection".to_string()
    } else {
        format!("/collection?{query}")
    }
}

fn with<F: FnOnce(&mut BrowseState)>(browse: &BrowseState, change: F) -> String {
    let mut next = browse.clone();
    change(&mut next);
    collection_url(&next)
}

fn sort_options(current: SortMode) -> Vec<SortOption> {
    [
        (SortMode::Relevant, "Relevance"),
        (SortMode::LowHigh, "Price: low to high"),
        (SortMode::HighLow, "Price: high to low"),
    ]
    .into_iter()
    .map(|(mode, label)| SortOption {
        value: mode.as_str(),
        label,
        selected: mode == current,
    })
    .collect()
}

fn preset_links(browse: &BrowseState) -> Vec<LinkView> {
    [
        (PricePreset::Under50, "Under 50"),
        (PricePreset::From50To100, "50 to 100"),
        (PricePreset::Above100, "Above 100"),
        (PricePreset::Clear, "Any price"),
    ]
    .into_iter()
    .map(|(preset, label)| LinkView {
        label,
        url: with(browse, |b| b.apply_preset(preset)),
    })
    .collect()
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the filtered, sorted, paginated catalog.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Result<CollectionTemplate, AppError> {
    let query = CollectionQuery::parse(raw.as_deref().unwrap_or_default());
    let browse = browse_state(&query)?;
    let snapshot = state.catalog().snapshot();
    let loading = snapshot.is_none();
    let catalog = snapshot.unwrap_or_default();

    let results = browse.results(&catalog);
    let filter = browse.filter();

    let categories = catalog
        .categories()
        .into_iter()
        .map(|name| CategoryOption {
            name: name.to_string(),
            selected: filter.categories.contains(name),
            toggle_url: with(&browse, |b| b.toggle_category(name)),
        })
        .collect();

    let prev_url = results
        .has_previous()
        .then(|| with(&browse, |b| b.set_page(results.number - 1)));
    let next_url = results
        .has_next()
        .then(|| with(&browse, |b| b.set_page(results.number + 1)));

    Ok(CollectionTemplate {
        loading,
        items: results.items.iter().copied().map(ItemView::from).collect(),
        search: filter.search.clone(),
        selected_categories: filter.categories.iter().cloned().collect(),
        categories,
        min_price: filter.min_price.map(|d| d.to_string()).unwrap_or_default(),
        max_price: filter.max_price.map(|d| d.to_string()).unwrap_or_default(),
        sort_options: sort_options(filter.sort),
        presets: preset_links(&browse),
        page: results.number,
        total_pages: results.total_pages,
        total_items: results.total_items,
        prev_url,
        next_url,
    })
}

/// Search suggestions fragment (HTMX).
#[instrument(skip(state))]
pub async fn suggest(
    State(state): State<AppState>,
    Query(query): Query<SuggestionsQuery>,
) -> SuggestionsTemplate {
    let catalog = state.catalog().current();
    let items = suggestions(&catalog, query.search.as_deref().unwrap_or_default())
        .into_iter()
        .map(ItemView::from)
        .collect();

    SuggestionsTemplate { items }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> CollectionQuery {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        parse_query(&encoded)
    }

    fn parse_query(encoded: &str) -> CollectionQuery {
        CollectionQuery::parse(encoded)
    }

    #[test]
    fn test_empty_query_is_default_state() {
        let browse = browse_state(&CollectionQuery::default()).unwrap();
        assert_eq!(browse, BrowseState::default());
        assert_eq!(collection_url(&browse), "/collection");
    }

    #[test]
    fn test_state_round_trips_through_url() {
        let browse = browse_state(&query(&[
            ("search", "linen shirt"),
            ("category", "Tops"),
            ("category", "Kitchen"),
            ("min_price", "5"),
            ("max_price", "80.5"),
            ("sort", "high-low"),
            ("page", "3"),
        ]))
        .unwrap();

        let url = collection_url(&browse);
        let again = parse_query(url.trim_start_matches("/collection?"));
        assert_eq!(browse_state(&again).unwrap(), browse);
        assert_eq!(browse.page(), 3);
    }

    #[test]
    fn test_toggle_resets_page() {
        let browse = browse_state(&query(&[("page", "4"), ("toggle", "Tops")])).unwrap();
        assert_eq!(browse.page(), 1);
        assert!(browse.filter().categories.contains("Tops"));
    }

    #[test]
    fn test_toggle_removes_selected_category() {
        let browse = browse_state(&query(&[
            ("category", "Tops"),
            ("category", "Kitchen"),
            ("toggle", "Tops"),
        ]))
        .unwrap();
        let selected: Vec<_> = browse.filter().categories.iter().collect();
        assert_eq!(selected, vec!["Kitchen"]);
    }

    #[test]
    fn test_preset_replaces_bounds() {
        let browse = browse_state(&query(&[
            ("min_price", "1"),
            ("max_price", "2"),
            ("page", "2"),
            ("preset", "above100"),
        ]))
        .unwrap();
        assert_eq!(browse.filter().min_price, Some(Decimal::from(100)));
        assert_eq!(browse.filter().max_price, None);
        assert_eq!(browse.page(), 1);
    }

    #[test]
    fn test_blank_prices_are_unbounded() {
        let browse =
            browse_state(&query(&[("min_price", ""), ("max_price", "  ")])).unwrap();
        assert_eq!(browse.filter().min_price, None);
        assert_eq!(browse.filter().max_price, None);
    }

    #[test]
    fn test_bad_input_is_rejected() {
        assert!(matches!(
            browse_state(&query(&[("min_price", "cheap")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            browse_state(&query(&[("page", "-1")])),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            browse_state(&query(&[("preset", "free")])),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let browse = browse_state(&query(&[("page", "0")])).unwrap();
        assert_eq!(browse.page(), 1);
    }

    #[test]
    fn test_category_with_comma_round_trips() {
        let browse = browse_state(&query(&[("toggle", "Shoes, Boots")])).unwrap();
        let url = collection_url(&browse);
        assert_eq!(url, "/collection?category=Shoes%2C+Boots");

        let again = browse_state(&parse_query(url.trim_start_matches("/collection?"))).unwrap();
        let selected: Vec<_> = again.filter().categories.iter().collect();
        assert_eq!(selected, vec!["Shoes, Boots"]);
    }

    #[test]
    fn test_blank_category_is_ignored() {
        let browse = browse_state(&query(&[("category", ""), ("category", " ")])).unwrap();
        assert!(browse.filter().categories.is_empty());
    }

    #[test]
    fn test_unknown_sort_is_relevant() {
        let browse = browse_state(&query(&[("sort", "newest")])).unwrap();
        assert_eq!(browse.filter().sort, SortMode::Relevant);
    }
}
