//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use shoop_core::SeoPage;
use shoop_db::{BannerRepository, ProductRepository};

use crate::error::Result;
use crate::filters;
use crate::middleware::SiteContext;
use crate::routes::views::{BannerView, ProductView};
use crate::state::AppState;

/// Products shown in each home page section.
const HOME_SECTION_SIZE: u32 = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub site: SiteContext,
    pub banners: Vec<BannerView>,
    pub featured_products: Vec<ProductView>,
    pub latest_products: Vec<ProductView>,
}

/// Display the home page.
#[instrument(skip(state, site))]
pub async fn home(State(state): State<AppState>, site: SiteContext) -> Result<HomeTemplate> {
    let site = site.with_seo(&state, SeoPage::Home).await?;
    let products = ProductRepository::new(state.pool());

    let banners = BannerRepository::new(state.pool()).list_active().await?;
    let featured = products.featured(HOME_SECTION_SIZE).await?;
    let latest = products.latest(HOME_SECTION_SIZE).await?;

    Ok(HomeTemplate {
        site,
        banners: banners.iter().map(BannerView::from).collect(),
        featured_products: ProductView::list(&featured),
        latest_products: ProductView::list(&latest),
    })
}
