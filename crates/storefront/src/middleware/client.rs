//! Client identity middleware.
//!
//! Every browser gets a random, long-lived `luxe-client` cookie. The id in it
//! selects the client's cart and wishlist in the
//! [`StoreRegistry`](crate::registry::StoreRegistry); it carries no
//! authority beyond that.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::Response,
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};
use tracing::Span;
use uuid::Uuid;

use super::find_cookie;
use crate::error::AppError;
use crate::state::AppState;

/// Name of the client identity cookie.
pub const CLIENT_COOKIE: &str = "luxe-client";

/// Client cookie lifetime in days.
const CLIENT_COOKIE_MAX_AGE_DAYS: i64 = 365;

/// Identifier of the browser making the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub Uuid);

impl ClientId {
    /// The underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

/// Parse a client cookie value. Only random (v4) UUIDs are accepted.
fn parse_client_id(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value)
        .ok()
        .filter(|id| id.get_version_num() == 4)
}

/// Build the `Set-Cookie` value for a newly issued client id.
fn client_cookie(id: Uuid, secure: bool) -> Cookie<'static> {
    Cookie::build((CLIENT_COOKIE, id.to_string()))
        .path("/")
        .max_age(Duration::days(CLIENT_COOKIE_MAX_AGE_DAYS))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Middleware that resolves (or issues) the client id.
///
/// A missing or unparseable cookie gets a fresh id, which is set on the
/// response. The id is stored in request extensions for [`ClientId`].
pub async fn client_id_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let existing = find_cookie(request.headers(), CLIENT_COOKIE)
        .and_then(|cookie| parse_client_id(cookie.value()));

    let (client, issued) = match existing {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };

    Span::current().record("client_id", tracing::field::display(client));
    request.extensions_mut().insert(ClientId(client));

    let mut response = next.run(request).await;

    if issued {
        let secure = state.config().base_url.scheme() == "https";
        let cookie = client_cookie(client, secure);
        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
                tracing::debug!(%client, "Issued client cookie");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode client cookie"),
        }
    }

    response
}

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .copied()
            .ok_or_else(|| AppError::Internal("client id middleware is not installed".to_string()))
    }
}
