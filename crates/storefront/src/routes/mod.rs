//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /shop?category=<slug>   - Product listing, optionally filtered
//! GET  /items/{id}             - Product detail
//! GET  /collections            - Category overview
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart
//! POST /cart/update            - Set line quantity (<= 0 removes)
//! POST /cart/remove            - Remove line
//! POST /cart/checkout          - Mock checkout (clears the cart)
//! GET  /cart/count             - Badge counts (JSON)
//!
//! # Wishlist
//! GET  /wishlist               - Wishlist page
//! POST /wishlist/add           - Save product
//! POST /wishlist/remove        - Unsave product
//! POST /wishlist/move-to-cart  - Add one unit of a saved product to the cart
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action (rate limited)
//! POST /logout                 - Logout action
//!
//! # Protected (route guard)
//! GET  /dashboard              - Store dashboard
//! GET  /admin                  - Store settings
//! GET  /add-item               - New product form
//!
//! # Pages
//! GET  /about                  - About page
//! GET  /contact                - Contact form
//! POST /contact                - Contact submission
//! GET  /consultation           - Consultation booking form
//! POST /consultation           - Consultation booking
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod collections;
pub mod contact;
pub mod home;
pub mod items;
pub mod pages;
pub mod shop;
pub mod wishlist;

mod shell;

use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Router,
    body::Body,
    extract::State,
    handler::Handler,
    http::{Request, Response},
    middleware,
    routing::{get, post},
};
use luxe_core::{Product, ProductId};
use tower_http::{
    services::ServeDir,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tracing::Span;

pub use shell::{PageShell, Visitor};

use crate::error::{AppError, Result};
use crate::middleware::{
    auth_rate_limiter, client_id_middleware, create_session_layer, request_id_middleware,
    route_guard_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/move-to-cart", post(wishlist::move_to_cart))
}

/// Create the auth routes router.
///
/// Only the credential check is rate limited.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).post(auth::login.layer(auth_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the protected page routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/admin", get(admin::settings))
        .route("/add-item", get(admin::add_item))
}

/// Create the informational page routes router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/about", get(pages::about))
        .route("/contact", get(contact::contact_page).post(contact::submit_contact))
        .route(
            "/consultation",
            get(contact::consultation_page).post(contact::book_consultation),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(shop::index))
        .route("/items/{id}", get(items::show))
        .route("/collections", get(collections::index))
        .nest("/cart", cart_routes())
        .nest("/wishlist", wishlist_routes())
        .merge(auth_routes())
        .merge(admin_routes())
        .merge(page_routes())
}

/// Build the complete application: routes, static files, and middleware.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(&static_dir))
        .nest_service("/assets", ServeDir::new(static_dir.join("assets")))
        .layer(session_layer)
        .layer(middleware::from_fn(route_guard_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            client_id_middleware,
        ))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        client_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<Body>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Reports how many client stores are
/// cached at debug level.
async fn health(State(state): State<AppState>) -> &'static str {
    tracing::debug!(cached_stores = state.stores().cached_stores(), "Health check");
    "ok"
}

// =============================================================================
// Form Helpers
// =============================================================================

/// Parse a form field, rejecting bad input with 400.
fn parse_field<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid {name}: {e}")))
}

/// Look up a catalog product by the raw `product_id` form field.
fn find_product<'a>(state: &'a AppState, raw_id: &str) -> Result<&'a Product> {
    let id: ProductId = parse_field("product_id", raw_id)?;
    state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Trim a free-text field, treating blank input as absent.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
