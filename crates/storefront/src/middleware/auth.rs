//! Authentication middleware and extractors.
//!
//! Authentication is a single opaque `auth-token` cookie set by the login
//! form. Its presence (with a non-empty value) is the whole check; the
//! value is never interpreted.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::cookie::{Cookie, SameSite, time::Duration};

use super::find_cookie;

/// Name of the authentication cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// Value written to the authentication cookie on login.
pub const AUTH_TOKEN_VALUE: &str = "luxury-auth-token";

/// Authentication cookie lifetime in seconds.
const AUTH_COOKIE_MAX_AGE_SECS: i64 = 60 * 60;

/// Where a successful login lands when no redirect was requested.
pub const DEFAULT_AFTER_LOGIN: &str = "/dashboard";

/// Paths that require the auth cookie (prefix match).
pub const PROTECTED_PREFIXES: &[&str] = &["/add-item", "/admin", "/dashboard"];

/// Paths authenticated clients are sent away from (prefix match).
pub const AUTH_PAGE_PREFIXES: &[&str] = &["/login", "/register"];

/// Paths the guard never looks at.
const UNGUARDED_PREFIXES: &[&str] = &["/api", "/static", "/assets", "/health", "/favicon.ico"];

/// Returns true if the request carries a non-empty auth cookie.
#[must_use]
pub fn is_authenticated(headers: &HeaderMap) -> bool {
    find_cookie(headers, AUTH_COOKIE).is_some_and(|cookie| !cookie.value().is_empty())
}

/// Cookie set after a successful login.
#[must_use]
pub fn login_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, AUTH_TOKEN_VALUE))
        .path("/")
        .max_age(Duration::seconds(AUTH_COOKIE_MAX_AGE_SECS))
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie that clears the auth token.
#[must_use]
pub fn logout_cookie() -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .same_site(SameSite::Lax)
        .build()
}

/// Resolve a post-login redirect target, defaulting to [`DEFAULT_AFTER_LOGIN`].
#[must_use]
pub fn safe_redirect_target(requested: Option<&str>) -> &str {
    local_path_or(requested, DEFAULT_AFTER_LOGIN)
}

/// Return `requested` if it is a same-site absolute path, else `fallback`.
///
/// See [`is_local_path`] for what counts as local.
#[must_use]
pub fn local_path_or<'a>(requested: Option<&'a str>, fallback: &'a str) -> &'a str {
    match requested.map(str::trim) {
        Some(path) if is_local_path(path) => path,
        _ => fallback,
    }
}

/// Returns true if `path` can only resolve to this site.
///
/// Browsers drop tabs and newlines and treat `\` as `/` when parsing URLs, so
/// `/\t/host` or `/\\host` would become a protocol-relative `//host`.
/// Backslashes and any control or whitespace character reject the path.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path
            .chars()
            .any(|c| c == '\\' || c.is_control() || c.is_whitespace())
}

// =============================================================================
// Route Guard
// =============================================================================

/// Outcome of checking a path against the guard tables.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GuardDecision {
    Allow,
    /// Anonymous request for a protected page.
    Login { from: String },
    /// Authenticated request for the login or register page.
    Home,
}

fn decide(path: &str, authenticated: bool) -> GuardDecision {
    if UNGUARDED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return GuardDecision::Allow;
    }

    if authenticated && AUTH_PAGE_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return GuardDecision::Home;
    }

    if !authenticated && PROTECTED_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return GuardDecision::Login {
            from: path.to_string(),
        };
    }

    GuardDecision::Allow
}

/// Login URL that returns to `from` afterwards.
#[must_use]
pub fn login_url(from: &str) -> String {
    format!("/login?redirect={}", urlencoding::encode(from))
}

/// Middleware that enforces the protected and auth-page tables.
pub async fn route_guard_middleware(request: Request, next: Next) -> Response {
    let authenticated = is_authenticated(request.headers());

    match decide(request.uri().path(), authenticated) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Login { from } => {
            tracing::debug!(path = %from, "Anonymous request for protected page");
            Redirect::temporary(&login_url(&from)).into_response()
        }
        GuardDecision::Home => Redirect::temporary("/").into_response(),
    }
}

// =============================================================================
// Extractor
// =============================================================================

/// Whether the request is authenticated.
///
/// Never rejects; handlers use it to adapt navigation and content.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(auth: AuthStatus) -> impl IntoResponse {
///     if auth.is_authenticated() { "Welcome back" } else { "Hello, guest" }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    authenticated: bool,
}

impl AuthStatus {
    /// Read the auth state from request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            authenticated: is_authenticated(headers),
        }
    }

    /// Returns true if the auth cookie is present.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        self.authenticated
    }
}

impl<S> FromRequestParts<S> for AuthStatus
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
