//! Per-request context shared by every page handler.

use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::flash::{self, Notice};
use crate::middleware::{AuthStatus, ClientId};
use crate::state::AppState;
use crate::store::ProductStore;

/// Data the base template needs on every page.
#[derive(Debug, Clone)]
pub struct PageShell {
    /// Units in the cart, for the header badge.
    pub cart_count: u64,
    /// Saved products, for the header badge.
    pub wishlist_count: usize,
    /// Whether to show the signed-in navigation.
    pub authenticated: bool,
    /// Flash notices to show once.
    pub notices: Vec<Notice>,
    /// Navigation key of the current page.
    pub active: &'static str,
}

/// The client behind a request: its store, auth state, and session.
pub struct Visitor {
    pub client: ClientId,
    pub store: Arc<ProductStore>,
    pub auth: AuthStatus,
    pub session: Session,
}

impl Visitor {
    /// Build the page shell, consuming pending notices.
    pub async fn shell(&self, active: &'static str) -> PageShell {
        let summary = self.store.summary();
        PageShell {
            cart_count: summary.cart_count,
            wishlist_count: summary.wishlist_count,
            authenticated: self.auth.is_authenticated(),
            notices: flash::take(&self.session).await,
            active,
        }
    }

    /// Queue a notice for the next rendered page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn notify(&self, notice: Notice) -> Result<()> {
        flash::push(&self.session, notice).await?;
        Ok(())
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let client = ClientId::from_request_parts(parts, state).await?;
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, message)| AppError::Internal(message.to_string()))?;

        Ok(Self {
            client,
            store: state.store_for(client.as_uuid()),
            auth: AuthStatus::from_headers(&parts.headers),
            session,
        })
    }
}
