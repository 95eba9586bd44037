//! Shop listing route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use luxe_core::Product;
use serde::Deserialize;
use tracing::instrument;

use super::{PageShell, Visitor, non_blank};
use crate::catalog::{CategorySummary, humanize_slug};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::store::ProductStore;

/// A product tile with the visitor's cart and wishlist state.
pub struct ProductCard {
    pub product: Product,
    pub in_cart: bool,
    pub in_wishlist: bool,
}

impl ProductCard {
    /// Build cards for `products` against one snapshot of the store.
    pub fn list<'a>(
        products: impl IntoIterator<Item = &'a Product>,
        store: &ProductStore,
    ) -> Vec<Self> {
        let cart = store.cart();
        let wishlist = store.wishlist();

        products
            .into_iter()
            .map(|product| Self {
                in_cart: cart.iter().any(|line| line.product.id == product.id),
                in_wishlist: wishlist.iter().any(|saved| saved.id == product.id),
                product: product.clone(),
            })
            .collect()
    }
}

/// Shop query parameters.
#[derive(Debug, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
}

/// Shop listing template.
#[derive(Template, WebTemplate)]
#[template(path = "shop/index.html")]
pub struct ShopTemplate {
    pub shell: PageShell,
    pub heading: String,
    pub selected: Option<String>,
    pub categories: Vec<CategorySummary>,
    pub cards: Vec<ProductCard>,
    pub return_to: String,
}

impl ShopTemplate {
    /// Returns true if `slug` is the active filter.
    #[must_use]
    pub fn is_selected(&self, slug: &str) -> bool {
        self.selected.as_deref() == Some(slug)
    }
}

/// Display the product listing.
///
/// `?category=<slug>` keeps products whose category slug equals it exactly;
/// an unknown slug yields an empty listing, not an error.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn index(
    State(state): State<AppState>,
    visitor: Visitor,
    Query(query): Query<ShopQuery>,
) -> Result<ShopTemplate> {
    let catalog = state.catalog();
    let selected = non_blank(query.category.as_deref()).map(str::to_string);

    let (products, heading, return_to) = match &selected {
        Some(slug) => (
            catalog.by_category(slug),
            catalog
                .category_name(slug)
                .map_or_else(|| humanize_slug(slug), str::to_string),
            format!("/shop?category={}", urlencoding::encode(slug)),
        ),
        None => (
            catalog.all().iter().collect(),
            "All Products".to_string(),
            "/shop".to_string(),
        ),
    };

    tracing::debug!(category = ?selected, results = products.len(), "Shop listing");

    Ok(ShopTemplate {
        shell: visitor.shell("shop").await,
        heading,
        selected,
        categories: catalog.categories(),
        cards: ProductCard::list(products, &visitor.store),
        return_to,
    })
}
