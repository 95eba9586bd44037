//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use luxe_core::Product;
use serde::Deserialize;
use tracing::instrument;

use super::{PageShell, Visitor, find_product};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::flash::Notice;
use crate::middleware::local_path_or;
use crate::state::AppState;
use crate::store::{CartChange, WishlistChange};

const WISHLIST_PATH: &str = "/wishlist";

/// A saved product with its cart state.
pub struct SavedItem {
    pub product: Product,
    pub in_cart: bool,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistTemplate {
    pub shell: PageShell,
    pub entries: Vec<SavedItem>,
}

/// Wishlist form data.
#[derive(Debug, Deserialize)]
pub struct WishlistForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

/// Display the wishlist page.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn show(visitor: Visitor) -> Result<WishlistTemplate> {
    let cart = visitor.store.cart();
    let entries = visitor
        .store
        .wishlist()
        .iter()
        .map(|product| SavedItem {
            in_cart: cart.iter().any(|line| line.product.id == product.id),
            product: product.clone(),
        })
        .collect();

    Ok(WishlistTemplate {
        shell: visitor.shell("wishlist").await,
        entries,
    })
}

/// Save a product.
///
/// Saving a product twice leaves the wishlist unchanged and reports it.
///
/// # Errors
///
/// Returns 400 for a malformed id and 404 for an unknown product.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn add(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;

    let product_id = product.id.to_string();
    add_breadcrumb(
        "wishlist",
        "Save to wishlist",
        Some(&[("product_id", product_id.as_str())]),
    );

    let notice = match visitor.store.add_to_wishlist(product) {
        WishlistChange::Added => Notice::success(format!("Added {} to your wishlist", product.name)),
        WishlistChange::AlreadyPresent => {
            Notice::error(format!("{} is already in your wishlist", product.name))
        }
    };
    visitor.notify(notice).await?;

    let target = local_path_or(form.return_to.as_deref(), WISHLIST_PATH);
    Ok(Redirect::to(target).into_response())
}

/// Remove a saved product.
///
/// # Errors
///
/// Returns 400 for a malformed id and 404 for an unknown product.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn remove(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;

    if let Some(removed) = visitor.store.remove_from_wishlist(product.id) {
        visitor
            .notify(Notice::info(format!(
                "Removed {} from your wishlist",
                removed.name
            )))
            .await?;
    }

    let target = local_path_or(form.return_to.as_deref(), WISHLIST_PATH);
    Ok(Redirect::to(target).into_response())
}

/// Add one unit of a saved product to the cart. It stays on the wishlist.
///
/// # Errors
///
/// Returns 400 for a malformed id and 404 for an unknown product.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn move_to_cart(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<WishlistForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;

    let notice = match visitor.store.move_to_cart(product.id) {
        Some(CartChange::Added { .. }) => {
            Notice::success(format!("Added {} to your cart", product.name))
        }
        Some(CartChange::Increased { quantity }) => Notice::success(format!(
            "{} quantity updated to {quantity}",
            product.name
        )),
        None => Notice::error(format!("{} is not in your wishlist", product.name)),
    };
    visitor.notify(notice).await?;

    let target = local_path_or(form.return_to.as_deref(), WISHLIST_PATH);
    Ok(Redirect::to(target).into_response())
}
