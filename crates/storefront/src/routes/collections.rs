//! Collection route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use luxe_core::Product;
use tracing::instrument;

use super::{PageShell, Visitor};
use crate::catalog::CategorySummary;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// A category with the product used as its cover.
pub struct CollectionView {
    pub category: CategorySummary,
    pub cover: Option<Product>,
}

/// Collection overview template.
#[derive(Template, WebTemplate)]
#[template(path = "collections/index.html")]
pub struct CollectionsTemplate {
    pub shell: PageShell,
    pub collections: Vec<CollectionView>,
}

/// Display every category with its product count.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn index(State(state): State<AppState>, visitor: Visitor) -> Result<CollectionsTemplate> {
    let catalog = state.catalog();
    let collections = catalog
        .categories()
        .into_iter()
        .map(|category| CollectionView {
            cover: catalog.by_category(&category.slug).first().map(|p| (*p).clone()),
            category,
        })
        .collect();

    Ok(CollectionsTemplate {
        shell: visitor.shell("collections").await,
        collections,
    })
}
