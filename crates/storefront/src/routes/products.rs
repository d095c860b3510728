//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use shoop_core::SeoPage;
use shoop_db::models::CatalogQuery;
use shoop_db::{CategoryRepository, ProductRepository};

use crate::error::Result;
use crate::filters;
use crate::middleware::SiteContext;
use crate::routes::views::ProductView;
use crate::state::AppState;

/// Products per catalog page.
pub const PER_PAGE: u32 = 12;

/// Related products shown under a product.
const RELATED_LIMIT: u32 = 4;

/// Catalog query parameters.
///
/// `page` is read as text so that garbage falls back to page one instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    pub page: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

impl CatalogParams {
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1)
    }

    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub site: SiteContext,
    pub products: Vec<ProductView>,
    /// Slug of the selected category, empty when unfiltered.
    pub current_category: String,
    pub current_category_name: String,
    pub search: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub total: i64,
    pub pages: Vec<PageLink>,
}

/// One button in the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub current: bool,
}

/// Pager buttons for `total_pages` pages; empty when everything fits on one.
fn page_links(current: u32, total_pages: u32) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }
    (1..=total_pages)
        .map(|number| PageLink {
            number,
            current: number == current,
        })
        .collect()
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub site: SiteContext,
    pub product: ProductView,
    pub related_products: Vec<ProductView>,
}

/// Display the product catalog.
#[instrument(skip(state, site))]
pub async fn index(
    State(state): State<AppState>,
    site: SiteContext,
    Query(params): Query<CatalogParams>,
) -> Result<ProductsIndexTemplate> {
    let mut site = site.with_seo(&state, SeoPage::Products).await?;

    // An unknown category slug shows the unfiltered catalog
    let category = match params.category() {
        Some(slug) => CategoryRepository::new(state.pool())
            .get_by_slug(slug)
            .await?
            .filter(|category| category.is_active),
        None => None,
    };
    if let Some(category) = &category {
        site = site.titled(category.name.clone());
    }

    let page = ProductRepository::new(state.pool())
        .catalog(&CatalogQuery {
            category_id: category.as_ref().map(|c| c.id.clone()),
            search: params.search().map(str::to_owned),
            page: params.page(),
            per_page: PER_PAGE,
        })
        .await?;

    let total_pages = page.total_pages();
    Ok(ProductsIndexTemplate {
        site,
        pages: page_links(page.page, total_pages),
        products: ProductView::list(&page.items),
        current_category: category.as_ref().map(|c| c.slug.clone()).unwrap_or_default(),
        current_category_name: category.map(|c| c.name).unwrap_or_default(),
        search: params.search().unwrap_or_default().to_owned(),
        current_page: page.page,
        total_pages,
        total: page.total,
    })
}

/// Display a product; unknown slugs go back to the catalog.
#[instrument(skip(state, site))]
pub async fn show(
    State(state): State<AppState>,
    site: SiteContext,
    Path(slug): Path<String>,
) -> Result<Response> {
    let products = ProductRepository::new(state.pool());
    let Some(product) = products.get_active_by_slug(&slug).await? else {
        return Ok(Redirect::to("/products").into_response());
    };

    let related = products.related(&product, RELATED_LIMIT).await?;

    Ok(ProductShowTemplate {
        site: site.titled(product.name.clone()),
        product: ProductView::from(&product),
        related_products: ProductView::list(&related),
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params(page: Option<&str>) -> CatalogParams {
        CatalogParams {
            page: page.map(str::to_owned),
            ..CatalogParams::default()
        }
    }

    #[test]
    fn test_page_param_falls_back_to_one() {
        assert_eq!(params(None).page(), 1);
        assert_eq!(params(Some("abc")).page(), 1);
        assert_eq!(params(Some("0")).page(), 1);
        assert_eq!(params(Some("3")).page(), 3);
    }

    #[test]
    fn test_page_links() {
        assert!(page_links(1, 1).is_empty());
        let links = page_links(2, 3);
        assert_eq!(links.len(), 3);
        assert!(links.get(1).unwrap().current);
        assert!(!links.first().unwrap().current);
    }

    #[test]
    fn test_blank_filters_ignored() {
        let p = CatalogParams {
            q: Some("   ".to_owned()),
            category: Some(String::new()),
            ..CatalogParams::default()
        };
        assert_eq!(p.search(), None);
        assert_eq!(p.category(), None);
    }
}
