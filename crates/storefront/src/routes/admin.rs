//! Protected store pages: dashboard, settings, and the new product form.
//!
//! The route guard keeps anonymous clients out before these run. The figures
//! and settings shown are fixed demo values; nothing here mutates state.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use luxe_core::Price;
use serde::Deserialize;
use tracing::instrument;

use super::{PageShell, Visitor};
use crate::catalog::CategorySummary;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;
use crate::store::StoreSummary;

// =============================================================================
// Dashboard
// =============================================================================

/// A headline figure on the dashboard.
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub change: &'static str,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub shell: PageShell,
    pub stats: Vec<StatCard>,
    /// The signed-in client's own cart and wishlist.
    pub session: StoreSummary,
    pub catalog_size: usize,
}

fn demo_stats(catalog_size: usize) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Total Products",
            value: catalog_size.to_string(),
            change: "+12%",
        },
        StatCard {
            title: "Total Orders",
            value: "142".to_string(),
            change: "+8%",
        },
        StatCard {
            title: "Total Revenue",
            value: Price::from_major(89_500).to_string(),
            change: "+23%",
        },
        StatCard {
            title: "Total Customers",
            value: "87".to_string(),
            change: "+5%",
        },
        StatCard {
            title: "Wishlist Items",
            value: "56".to_string(),
            change: "+15%",
        },
        StatCard {
            title: "Cart Items",
            value: "23".to_string(),
            change: "+3%",
        },
    ]
}

/// Display the store dashboard.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn dashboard(
    State(state): State<AppState>,
    visitor: Visitor,
) -> Result<DashboardTemplate> {
    let catalog_size = state.catalog().len();

    Ok(DashboardTemplate {
        shell: visitor.shell("dashboard").await,
        stats: demo_stats(catalog_size),
        session: visitor.store.summary(),
        catalog_size,
    })
}

// =============================================================================
// Settings
// =============================================================================

/// How a setting is displayed.
#[derive(Debug, Clone, Copy)]
pub enum SettingKind {
    Text,
    Toggle(bool),
    Select(&'static [&'static str]),
    Number,
    Status,
}

/// One read-only setting row.
pub struct Setting {
    pub name: &'static str,
    pub value: &'static str,
    pub kind: SettingKind,
}

impl Setting {
    /// Returns true if `option` is the current value.
    #[must_use]
    pub fn is_selected(&self, option: &str) -> bool {
        self.value == option
    }

    /// Returns true for a toggle that is switched on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self.kind, SettingKind::Toggle(true))
    }
}

/// A settings tab.
pub struct SettingsTab {
    pub id: &'static str,
    pub name: &'static str,
    pub settings: &'static [Setting],
}

const SETTINGS_TABS: &[SettingsTab] = &[
    SettingsTab {
        id: "general",
        name: "General",
        settings: &[
            Setting {
                name: "Store Name",
                value: "LUXE COLLECTION",
                kind: SettingKind::Text,
            },
            Setting {
                name: "Email Notifications",
                value: "On",
                kind: SettingKind::Toggle(true),
            },
            Setting {
                name: "Maintenance Mode",
                value: "Off",
                kind: SettingKind::Toggle(false),
            },
            Setting {
                name: "Currency",
                value: "USD",
                kind: SettingKind::Select(&["USD", "EUR", "GBP"]),
            },
        ],
    },
    SettingsTab {
        id: "security",
        name: "Security",
        settings: &[
            Setting {
                name: "Two-Factor Authentication",
                value: "On",
                kind: SettingKind::Toggle(true),
            },
            Setting {
                name: "Session Timeout",
                value: "30 minutes",
                kind: SettingKind::Select(&["15 minutes", "30 minutes", "1 hour", "2 hours"]),
            },
            Setting {
                name: "Failed Login Attempts",
                value: "5",
                kind: SettingKind::Number,
            },
            Setting {
                name: "Password Expiry",
                value: "90 days",
                kind: SettingKind::Select(&["30 days", "60 days", "90 days", "Never"]),
            },
        ],
    },
    SettingsTab {
        id: "database",
        name: "Database",
        settings: &[
            Setting {
                name: "Database Status",
                value: "Connected",
                kind: SettingKind::Status,
            },
            Setting {
                name: "Last Backup",
                value: "2 hours ago",
                kind: SettingKind::Text,
            },
            Setting {
                name: "Storage Used",
                value: "2.4 GB",
                kind: SettingKind::Text,
            },
            Setting {
                name: "Auto Backup",
                value: "On",
                kind: SettingKind::Toggle(true),
            },
        ],
    },
    SettingsTab {
        id: "monitoring",
        name: "Monitoring",
        settings: &[
            Setting {
                name: "Server Uptime",
                value: "99.9%",
                kind: SettingKind::Text,
            },
            Setting {
                name: "Response Time",
                value: "120ms",
                kind: SettingKind::Text,
            },
            Setting {
                name: "Active Users",
                value: "24",
                kind: SettingKind::Number,
            },
            Setting {
                name: "Error Rate",
                value: "0.1%",
                kind: SettingKind::Text,
            },
        ],
    },
];

/// Settings query parameters.
#[derive(Debug, Deserialize)]
pub struct SettingsQuery {
    pub tab: Option<String>,
}

/// Settings template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/settings.html")]
pub struct SettingsTemplate {
    pub shell: PageShell,
    pub tabs: &'static [SettingsTab],
    pub active_tab: &'static SettingsTab,
}

/// Find a tab by id, falling back to the first.
fn settings_tab(id: Option<&str>) -> Option<&'static SettingsTab> {
    id.and_then(|id| SETTINGS_TABS.iter().find(|tab| tab.id == id))
        .or_else(|| SETTINGS_TABS.first())
}

/// Display the store settings.
///
/// `?tab=<id>` selects a tab; unknown ids show the general tab.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn settings(
    visitor: Visitor,
    Query(query): Query<SettingsQuery>,
) -> Result<SettingsTemplate> {
    let active_tab = settings_tab(query.tab.as_deref())
        .ok_or_else(|| AppError::Internal("no settings tabs defined".to_string()))?;

    Ok(SettingsTemplate {
        shell: visitor.shell("admin").await,
        tabs: SETTINGS_TABS,
        active_tab,
    })
}

// =============================================================================
// Add Item
// =============================================================================

/// New product form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/add_item.html")]
pub struct AddItemTemplate {
    pub shell: PageShell,
    pub categories: Vec<CategorySummary>,
}

/// Display the new product form.
///
/// The catalog is fixed at startup, so the form is not wired to a handler.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn add_item(State(state): State<AppState>, visitor: Visitor) -> Result<AddItemTemplate> {
    Ok(AddItemTemplate {
        shell: visitor.shell("add-item").await,
        categories: state.catalog().categories(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_tab_lookup() {
        assert_eq!(settings_tab(Some("security")).unwrap().id, "security");
        assert_eq!(settings_tab(Some("monitoring")).unwrap().name, "Monitoring");
        assert_eq!(settings_tab(Some("billing")).unwrap().id, "general");
        assert_eq!(settings_tab(None).unwrap().id, "general");
    }

    #[test]
    fn test_demo_stats() {
        let stats = demo_stats(6);
        assert_eq!(stats.len(), 6);
        assert_eq!(stats.first().unwrap().value, "6");
        assert!(stats.iter().any(|s| s.title == "Total Revenue"));
    }
}
