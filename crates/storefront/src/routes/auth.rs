//! Authentication route handlers.
//!
//! The login form checks one configured credential pair and, on success,
//! sets the `auth-token` cookie the route guard looks for.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use luxe_core::Email;
use serde::Deserialize;
use tracing::instrument;

use super::{PageShell, Visitor, non_blank};
use crate::error::Result;
use crate::filters;
use crate::flash::Notice;
use crate::middleware::auth::{login_cookie, logout_cookie, safe_redirect_target};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub redirect: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("redirect", &self.redirect)
            .finish()
    }
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub redirect: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub shell: PageShell,
    pub error: Option<String>,
    /// Where to go after signing in, carried through a hidden field.
    pub redirect: Option<String>,
    /// Previously submitted email, kept on failure.
    pub email: String,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn login_page(visitor: Visitor, Query(query): Query<LoginQuery>) -> Result<LoginTemplate> {
    Ok(LoginTemplate {
        shell: visitor.shell("login").await,
        error: non_blank(query.error.as_deref()).map(str::to_string),
        redirect: non_blank(query.redirect.as_deref()).map(str::to_string),
        email: String::new(),
    })
}

/// Handle login form submission.
///
/// A wrong pair re-renders the form with 401. A correct pair sets the auth
/// cookie and redirects to the requested local path, or the dashboard.
#[instrument(skip(state, visitor, form), fields(client = %visitor.client.0))]
pub async fn login(
    State(state): State<AppState>,
    visitor: Visitor,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let verified = Email::parse(&form.email)
        .is_ok_and(|email| state.config().admin.verify(&email, &form.password));

    if !verified {
        tracing::warn!("Failed login attempt");
        let page = LoginTemplate {
            shell: visitor.shell("login").await,
            error: Some(INVALID_CREDENTIALS.to_string()),
            redirect: non_blank(form.redirect.as_deref()).map(str::to_string),
            email: form.email.trim().to_string(),
        };
        return Ok((StatusCode::UNAUTHORIZED, page).into_response());
    }

    tracing::info!("Login succeeded");
    visitor.notify(Notice::success("Welcome back")).await?;

    let target = safe_redirect_target(non_blank(form.redirect.as_deref()));
    Ok((
        AppendHeaders([(SET_COOKIE, login_cookie().to_string())]),
        Redirect::to(target),
    )
        .into_response())
}

/// Handle logout: clear the auth cookie and return home.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn logout(visitor: Visitor) -> Result<Response> {
    visitor.notify(Notice::info("You have been signed out")).await?;

    Ok((
        AppendHeaders([(SET_COOKIE, logout_cookie().to_string())]),
        Redirect::to("/"),
    )
        .into_response())
}
