//! Static content pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use shoop_core::SeoPage;
use shoop_db::AboutPageRepository;
use shoop_db::models::AboutPage;

use crate::error::Result;
use crate::filters;
use crate::middleware::SiteContext;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub site: SiteContext,
    pub about: AboutPage,
}

/// Contact page template. Contact details come from the company info in
/// the layout context.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub site: SiteContext,
}

/// Display the about page.
#[instrument(skip_all)]
pub async fn about(State(state): State<AppState>, site: SiteContext) -> Result<AboutTemplate> {
    let site = site.with_seo(&state, SeoPage::About).await?;
    let about = AboutPageRepository::new(state.pool())
        .get()
        .await?
        .unwrap_or_default();

    Ok(AboutTemplate { site, about })
}

/// Display the contact page.
#[instrument(skip_all)]
pub async fn contact(State(state): State<AppState>, site: SiteContext) -> Result<ContactTemplate> {
    let site = site.with_seo(&state, SeoPage::Contact).await?;
    Ok(ContactTemplate { site })
}
