//! One-shot notices carried across a redirect.
//!
//! Form handlers push a [`Notice`] describing what the store did, then
//! redirect. The next rendered page takes every pending notice out of the
//! session and shows it once.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// Session keys for flash data.
pub mod keys {
    /// Key for pending notices.
    pub const NOTICES: &str = "flash_notices";
}

/// Pending notices beyond this many drop the oldest.
const MAX_PENDING: usize = 8;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    /// CSS modifier used by the base template.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "notice-success",
            Self::Info => "notice-info",
            Self::Error => "notice-error",
        }
    }
}

/// A message for the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// CSS class for the template.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

/// Queue `notice` for the next rendered page.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn push(session: &Session, notice: Notice) -> Result<(), tower_sessions::session::Error> {
    let mut pending: Vec<Notice> = session.get(keys::NOTICES).await?.unwrap_or_default();
    pending.push(notice);
    if pending.len() > MAX_PENDING {
        let excess = pending.len() - MAX_PENDING;
        pending.drain(..excess);
    }
    session.insert(keys::NOTICES, pending).await
}

/// Take every pending notice, oldest first.
///
/// A session failure is logged and yields no notices; losing a notice never
/// fails the page.
pub async fn take(session: &Session) -> Vec<Notice> {
    match session.remove::<Vec<Notice>>(keys::NOTICES).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read flash notices");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn test_take_returns_notices_once() {
        let session = session();
        push(&session, Notice::success("Added to cart")).await.unwrap();
        push(&session, Notice::error("Already saved")).await.unwrap();

        let notices = take(&session).await;
        assert_eq!(
            notices,
            vec![Notice::success("Added to cart"), Notice::error("Already saved")]
        );
        assert!(take(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_pending_notices_are_bounded() {
        let session = session();
        for i in 0..MAX_PENDING + 3 {
            push(&session, Notice::info(format!("notice {i}"))).await.unwrap();
        }

        let notices = take(&session).await;
        assert_eq!(notices.len(), MAX_PENDING);
        assert_eq!(notices[0].message, "notice 3");
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(Notice::success("x").css_class(), "notice-success");
        assert_eq!(Notice::error("x").css_class(), "notice-error");
    }
}
