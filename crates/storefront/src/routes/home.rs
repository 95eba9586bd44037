//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use super::shop::ProductCard;
use super::{PageShell, Visitor};
use crate::catalog::CategorySummary;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Products shown in the best sellers row.
const BEST_SELLERS: usize = 4;

/// A client testimonial.
pub struct Testimonial {
    pub quote: &'static str,
    pub author: &'static str,
    pub title: &'static str,
}

const TESTIMONIALS: &[Testimonial] = &[
    Testimonial {
        quote: "The quality of the silk gown exceeded every expectation. I felt extraordinary all evening.",
        author: "Isabella Laurent",
        title: "Paris",
    },
    Testimonial {
        quote: "Impeccable tailoring and service. My linen suit is the best I have ever owned.",
        author: "James Whitmore",
        title: "London",
    },
    Testimonial {
        quote: "Every piece feels timeless. LUXE has become my first stop for anything special.",
        author: "Sofia Moretti",
        title: "Milan",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub shell: PageShell,
    pub categories: Vec<CategorySummary>,
    pub best_sellers: Vec<ProductCard>,
    pub testimonials: &'static [Testimonial],
    pub return_to: String,
}

/// Display the home page.
#[instrument(skip(state, visitor), fields(client = %visitor.client.0))]
pub async fn home(State(state): State<AppState>, visitor: Visitor) -> Result<HomeTemplate> {
    let catalog = state.catalog();

    Ok(HomeTemplate {
        shell: visitor.shell("home").await,
        categories: catalog.categories(),
        best_sellers: ProductCard::list(catalog.featured(BEST_SELLERS), &visitor.store),
        testimonials: TESTIMONIALS,
        return_to: "/".to_string(),
    })
}
