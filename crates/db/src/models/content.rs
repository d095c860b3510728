//! Storefront content: banners, company info, about page and SEO metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoop_core::{AboutPageId, BannerId, CompanyInfoId, SeoBannerId, SeoPage};

/// A home page slider banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub link: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Editable banner fields.
#[derive(Debug, Clone, Default)]
pub struct BannerInput {
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub link: String,
    pub sort_order: i64,
    pub is_active: bool,
}

/// Company details shown in the storefront header and footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub id: Option<CompanyInfoId>,
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub logo_url: String,
    pub facebook_url: String,
    pub zalo_url: String,
    pub copyright: String,
}

/// Editable company fields.
#[derive(Debug, Clone, Default)]
pub struct CompanyInfoInput {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub logo_url: String,
    pub facebook_url: String,
    pub zalo_url: String,
    pub copyright: String,
}

/// The storefront "about us" page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutPage {
    pub id: Option<AboutPageId>,
    pub title: String,
    pub content: String,
    pub image: String,
}

/// Editable about page fields.
#[derive(Debug, Clone, Default)]
pub struct AboutPageInput {
    pub title: String,
    pub content: String,
    pub image: String,
}

/// Meta tags for one storefront page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoBanner {
    pub id: Option<SeoBannerId>,
    pub page: SeoPage,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_image: String,
}

impl SeoBanner {
    /// Metadata for a page that has never been edited.
    #[must_use]
    pub fn empty(page: SeoPage) -> Self {
        Self {
            id: None,
            page,
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            og_image: String::new(),
        }
    }
}

/// Editable SEO fields.
#[derive(Debug, Clone, Default)]
pub struct SeoBannerInput {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_image: String,
}
