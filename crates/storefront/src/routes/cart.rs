//! Cart route handlers.
//!
//! Mutations are plain form posts: each one changes the client's store,
//! queues a notice describing what happened, and redirects back.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use luxe_core::{CartLine, Price, Quantity};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{PageShell, Visitor, find_product, parse_field};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::flash::Notice;
use crate::middleware::local_path_or;
use crate::state::AppState;
use crate::store::{CartChange, QuantityChange};

const CART_PATH: &str = "/cart";

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartTemplate {
    pub shell: PageShell,
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
}

/// Order confirmation shown after the mock checkout.
#[derive(Template, WebTemplate)]
#[template(path = "cart/checkout_complete.html")]
pub struct CheckoutCompleteTemplate {
    pub shell: PageShell,
    pub order_number: String,
    pub lines: Vec<CartLine>,
    pub total: Price,
}

/// Add to cart form data.
///
/// Numeric fields arrive as text so malformed input maps to 400 rather than
/// the extractor's 422.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: String,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Badge counts returned by `/cart/count`.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
    pub wishlist: usize,
    pub total: Price,
}

/// Display the cart page.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn show(visitor: Visitor) -> Result<CartTemplate> {
    let lines = visitor.store.cart().to_vec();
    let subtotal = lines.iter().map(CartLine::line_total).sum();

    Ok(CartTemplate {
        shell: visitor.shell("cart").await,
        lines,
        subtotal,
    })
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns 400 for a malformed id or a quantity below one, and 404 for an
/// unknown product.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn add(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;
    let quantity = match form.quantity.as_deref() {
        Some(raw) => {
            let requested: i64 = parse_field("quantity", raw)?;
            Quantity::from_signed(requested).ok_or_else(|| {
                AppError::BadRequest("quantity must be at least 1".to_string())
            })?
        }
        None => Quantity::ONE,
    };

    let product_id = product.id.to_string();
    add_breadcrumb("cart", "Add to cart", Some(&[("product_id", product_id.as_str())]));

    let message = match visitor.store.add_to_cart(product, quantity) {
        CartChange::Added { .. } => format!("Added {} to your cart", product.name),
        CartChange::Increased { quantity } => {
            format!("{} quantity updated to {quantity}", product.name)
        }
    };
    visitor.notify(Notice::success(message)).await?;

    let target = local_path_or(form.return_to.as_deref(), CART_PATH);
    Ok(Redirect::to(target).into_response())
}

/// Set a line to an exact quantity. Zero or less removes it.
///
/// # Errors
///
/// Returns 400 for malformed input and 404 for an unknown product.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn update(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;
    let quantity: i64 = parse_field("quantity", &form.quantity)?;

    let notice = match visitor.store.update_quantity(product.id, quantity) {
        QuantityChange::Updated { previous, quantity } if previous == quantity => None,
        QuantityChange::Updated { quantity, .. } => Some(Notice::success(format!(
            "{} quantity updated to {quantity}",
            product.name
        ))),
        QuantityChange::Removed(line) => Some(Notice::info(format!(
            "Removed {} from your cart",
            line.product.name
        ))),
        QuantityChange::NotInCart => Some(Notice::error(format!(
            "{} is not in your cart",
            product.name
        ))),
    };
    if let Some(notice) = notice {
        visitor.notify(notice).await?;
    }

    Ok(Redirect::to(CART_PATH).into_response())
}

/// Remove a line from the cart.
///
/// # Errors
///
/// Returns 400 for a malformed id and 404 for an unknown product.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn remove(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product = find_product(&state, &form.product_id)?;

    if let Some(line) = visitor.store.remove_from_cart(product.id) {
        visitor
            .notify(Notice::info(format!(
                "Removed {} from your cart",
                line.product.name
            )))
            .await?;
    }

    Ok(Redirect::to(CART_PATH).into_response())
}

/// Mock checkout: empties the cart and shows a confirmation.
///
/// No payment is taken. An empty cart bounces back with an error notice.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn checkout(visitor: Visitor) -> Result<Response> {
    let lines = visitor.store.clear_cart();
    if lines.is_empty() {
        visitor.notify(Notice::error("Your cart is empty")).await?;
        return Ok(Redirect::to(CART_PATH).into_response());
    }

    let total: Price = lines.iter().map(CartLine::line_total).sum();
    let order_number = order_number();
    add_breadcrumb("cart", "Checkout", Some(&[("order_number", order_number.as_str())]));
    tracing::info!(
        order_number = %order_number,
        lines = lines.len(),
        total = %total,
        "Mock checkout completed"
    );

    Ok(CheckoutCompleteTemplate {
        shell: visitor.shell("cart").await,
        order_number,
        lines,
        total,
    }
    .into_response())
}

/// Badge counts as JSON.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn count(visitor: Visitor) -> Json<CartCount> {
    let summary = visitor.store.summary();
    Json(CartCount {
        count: summary.cart_count,
        wishlist: summary.wishlist_count,
        total: summary.cart_total,
    })
}

/// Short human-readable order reference, e.g. `LX-3F9A2C1B`.
fn order_number() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("LX-{}", id.get(..8).unwrap_or(&id).to_ascii_uppercase())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        let number = order_number();
        let suffix = number.strip_prefix("LX-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }
}
