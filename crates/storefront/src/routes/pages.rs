//! Informational page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use super::{PageShell, Visitor};
use crate::error::Result;
use crate::filters;

/// A brand value shown on the about page.
pub struct BrandValue {
    pub title: &'static str,
    pub body: &'static str,
}

/// A team member shown on the about page.
pub struct TeamMember {
    pub name: &'static str,
    pub role: &'static str,
    pub bio: &'static str,
}

const VALUES: &[BrandValue] = &[
    BrandValue {
        title: "Quality First",
        body: "We never compromise on materials or construction. Only the finest components make it into our collections.",
    },
    BrandValue {
        title: "Timeless Design",
        body: "Creating pieces that transcend seasonal trends and remain relevant for years to come.",
    },
    BrandValue {
        title: "Sustainable Luxury",
        body: "Ethical sourcing and responsible production practices that respect both people and planet.",
    },
];

const TEAM: &[TeamMember] = &[
    TeamMember {
        name: "Elena Marchetti",
        role: "Creative Director",
        bio: "Leading our design vision with over 15 years of industry experience",
    },
    TeamMember {
        name: "Julien Besson",
        role: "Head of Atelier",
        bio: "Overseeing every garment from first pattern to final stitch",
    },
    TeamMember {
        name: "Amara Okafor",
        role: "Client Experience",
        bio: "Making every consultation and delivery feel personal",
    },
];

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate {
    pub shell: PageShell,
    pub values: &'static [BrandValue],
    pub team: &'static [TeamMember],
}

/// Display the about page.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn about(visitor: Visitor) -> Result<AboutTemplate> {
    Ok(AboutTemplate {
        shell: visitor.shell("about").await,
        values: VALUES,
        team: TEAM,
    })
}
