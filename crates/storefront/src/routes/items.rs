//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use luxe_core::{Product, ProductId};
use tracing::instrument;

use super::shop::ProductCard;
use super::{PageShell, Visitor};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Related products shown under the detail view.
const RELATED_COUNT: usize = 3;

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "items/show.html")]
pub struct ItemTemplate {
    pub shell: PageShell,
    pub product: Product,
    pub category_slug: String,
    /// Units already in the cart, zero if none.
    pub in_cart: u32,
    pub in_wishlist: bool,
    pub related: Vec<ProductCard>,
    pub return_to: String,
}

/// Display a product.
///
/// # Errors
///
/// Returns 404 if the id is not numeric or no product has it.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn show(
    State(state): State<AppState>,
    visitor: Visitor,
    Path(raw_id): Path<String>,
) -> Result<ItemTemplate> {
    let product = raw_id
        .parse::<ProductId>()
        .ok()
        .and_then(|id| state.catalog().get(id))
        .ok_or_else(|| AppError::NotFound(format!("item {raw_id}")))?;

    let in_cart = visitor
        .store
        .cart_line(product.id)
        .map_or(0, |line| line.quantity.get());

    Ok(ItemTemplate {
        shell: visitor.shell("shop").await,
        category_slug: product.category_slug(),
        in_cart,
        in_wishlist: visitor.store.is_in_wishlist(product.id),
        related: ProductCard::list(
            state.catalog().related(product.id, RELATED_COUNT),
            &visitor.store,
        ),
        return_to: format!("/items/{}", product.id),
        product: product.clone(),
    })
}
