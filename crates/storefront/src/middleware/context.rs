//! Shared layout context for every storefront page.
//!
//! Pulls the logged-in customer, flash messages (consumed here) and the
//! cart count out of the session, and loads the company info and the
//! navigation categories from the database.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use shoop_core::{Cart, SeoPage};
use shoop_db::models::{Category, CompanyInfo, SeoBanner};
use shoop_db::{CategoryRepository, CompanyInfoRepository, SeoBannerRepository};

use crate::error::AppError;
use crate::middleware::flash::Flash;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Data every page template needs for the header, footer and `<head>`.
#[derive(Debug, Clone)]
pub struct SiteContext {
    pub user: Option<CurrentUser>,
    pub flash: Flash,
    /// Sum of quantities in the cart.
    pub cart_count: u32,
    pub company: CompanyInfo,
    /// Active categories by `sort_order`, for the navigation menu.
    pub categories: Vec<Category>,
    /// Title for `<title>`; page SEO overrides it.
    pub title: String,
    pub seo: Option<SeoBanner>,
}

impl SiteContext {
    /// Set the page title.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Attach the SEO row saved for `page`, if any, and use its title.
    ///
    /// # Errors
    ///
    /// Returns an error if the SEO lookup fails.
    pub async fn with_seo(mut self, state: &AppState, page: SeoPage) -> Result<Self, AppError> {
        let seo = SeoBannerRepository::new(state.pool()).get(page).await?;
        self.title = seo
            .as_ref()
            .map(|seo| seo.title.trim())
            .filter(|title| !title.is_empty())
            .unwrap_or(page.default_title())
            .to_owned();
        self.seo = seo;
        Ok(self)
    }

    /// Whether a customer is logged in.
    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Display name of the logged-in customer, or empty.
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("", |user| user.name.as_str())
    }

    /// Meta description for `<head>`.
    #[must_use]
    pub fn meta_description(&self) -> &str {
        self.seo
            .as_ref()
            .map(|seo| seo.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(self.company.tagline.as_str())
    }
}

impl FromRequestParts<AppState> for SiteContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;
        let flash = Flash::take(&session).await?;
        let cart_count = session
            .get::<Cart>(session_keys::CART)
            .await?
            .map_or(0, |cart| cart.count());

        let company = CompanyInfoRepository::new(state.pool())
            .get()
            .await?
            .unwrap_or_default();
        let categories = CategoryRepository::new(state.pool()).list_active().await?;

        Ok(Self {
            user,
            flash,
            cart_count,
            title: company.name.clone(),
            company,
            categories,
            seo: None,
        })
    }
}
