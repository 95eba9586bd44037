//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers
//! 5. Client identity (`luxe-client` cookie)
//! 6. Route guard (`auth-token` cookie)
//! 7. Session layer (flash notices, in-memory store)
//! 8. Rate limiting on `POST /login` (governor)

pub mod auth;
pub mod client;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

use axum::http::{HeaderMap, header::COOKIE};
use tower_sessions::cookie::Cookie;

pub use auth::{AuthStatus, local_path_or, route_guard_middleware};
pub use client::{ClientId, client_id_middleware};
pub use rate_limit::auth_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;

/// Find a request cookie by name across every `Cookie` header.
///
/// Malformed pairs are skipped. The first cookie with `name` wins.
pub(crate) fn find_cookie(headers: &HeaderMap, name: &str) -> Option<Cookie<'static>> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value.to_owned()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_find_cookie() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; auth-token=abc"));
        headers.append(COOKIE, HeaderValue::from_static("luxe-client=123"));

        assert_eq!(find_cookie(&headers, "auth-token").unwrap().value(), "abc");
        assert_eq!(find_cookie(&headers, "luxe-client").unwrap().value(), "123");
        assert!(find_cookie(&headers, "missing").is_none());
    }

    #[test]
    fn test_find_cookie_skips_garbage() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static(";;=novalue; auth-token=ok"));
        assert_eq!(find_cookie(&headers, "auth-token").unwrap().value(), "ok");
    }
}
