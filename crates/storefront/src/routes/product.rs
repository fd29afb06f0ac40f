//! Item detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use bazaar_core::{CatalogItem, CatalogItemId, ItemLookup};

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Catalog item display data for templates.
#[derive(Clone)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: String,
    pub category: Option<String>,
}

impl From<&CatalogItem> for ItemView {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            price: item.unit_price().display(),
            category: item.category.clone(),
        }
    }
}

/// Item detail page template.
///
/// `item` is `None` when the catalog is still loading or has no such item.
#[derive(Template, WebTemplate)]
#[template(path = "product/show.html")]
pub struct ProductShowTemplate {
    pub loading: bool,
    pub item: Option<ItemView>,
}

/// Display a single catalog item.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = CatalogItemId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let catalog = state.catalog().snapshot();

    let response = match ItemLookup::resolve(catalog.as_deref(), &id) {
        ItemLookup::Loading => ProductShowTemplate {
            loading: true,
            item: None,
        }
        .into_response(),
        ItemLookup::NotFound => (
            StatusCode::NOT_FOUND,
            ProductShowTemplate {
                loading: false,
                item: None,
            },
        )
            .into_response(),
        ItemLookup::Found(item) => ProductShowTemplate {
            loading: false,
            item: Some(ItemView::from(item)),
        }
        .into_response(),
    };

    Ok(response)
}
