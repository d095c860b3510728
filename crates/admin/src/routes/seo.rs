//! Per-page SEO metadata editor.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shoop_core::SeoPage;
use shoop_db::SeoBannerRepository;
use shoop_db::models::{SeoBanner, SeoBannerInput};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, flash_success};
use crate::state::AppState;

/// One storefront page in the SEO overview.
#[derive(Debug, Clone)]
pub struct SeoRowView {
    pub page: &'static str,
    pub page_name: &'static str,
    pub title: String,
    pub description: String,
    pub configured: bool,
}

fn rows(saved: &[SeoBanner]) -> Vec<SeoRowView> {
    SeoPage::ALL
        .into_iter()
        .map(|page| {
            let seo = saved.iter().find(|seo| seo.page == page);
            SeoRowView {
                page: page.as_str(),
                page_name: page.default_title(),
                title: seo.map(|s| s.title.clone()).unwrap_or_default(),
                description: seo.map(|s| s.description.clone()).unwrap_or_default(),
                configured: seo.is_some(),
            }
        })
        .collect()
}

/// SEO form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeoForm {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub og_image: String,
}

/// SEO overview template.
#[derive(Template, WebTemplate)]
#[template(path = "seo/index.html")]
pub struct SeoIndexTemplate {
    pub ctx: AdminContext,
    pub pages: Vec<SeoRowView>,
}

/// SEO form template.
#[derive(Template, WebTemplate)]
#[template(path = "seo/form.html")]
pub struct SeoFormTemplate {
    pub ctx: AdminContext,
    pub page: &'static str,
    pub page_name: &'static str,
    pub form: SeoForm,
}

fn parse_page(raw: &str) -> Result<SeoPage> {
    raw.parse()
        .map_err(|_| AppError::NotFound(format!("seo page {raw}")))
}

/// GET /admin/seo
#[instrument(skip_all)]
pub async fn index(ctx: AdminContext, State(state): State<AppState>) -> Result<SeoIndexTemplate> {
    let saved = SeoBannerRepository::new(state.pool()).list().await?;

    Ok(SeoIndexTemplate {
        ctx: ctx.titled("SEO"),
        pages: rows(&saved),
    })
}

/// GET /admin/seo/{page}
#[instrument(skip(ctx, state))]
pub async fn edit_form(
    ctx: AdminContext,
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> Result<SeoFormTemplate> {
    let page = parse_page(&page)?;
    let seo = SeoBannerRepository::new(state.pool())
        .get(page)
        .await?
        .unwrap_or_else(|| SeoBanner::empty(page));

    Ok(SeoFormTemplate {
        ctx: ctx.titled(format!("SEO - {}", page.default_title())),
        page: page.as_str(),
        page_name: page.default_title(),
        form: SeoForm {
            title: seo.title,
            description: seo.description,
            keywords: seo.keywords,
            og_image: seo.og_image,
        },
    })
}

/// POST /admin/seo/{page}
#[instrument(skip_all, fields(page = %page))]
pub async fn save(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(page): Path<String>,
    Form(form): Form<SeoForm>,
) -> Result<Redirect> {
    let page = parse_page(&page)?;
    let input = SeoBannerInput {
        title: form.title.trim().to_owned(),
        description: form.description.trim().to_owned(),
        keywords: form.keywords.trim().to_owned(),
        og_image: form.og_image.trim().to_owned(),
    };
    SeoBannerRepository::new(state.pool()).save(page, &input).await?;

    tracing::info!(page = %page, admin = %admin.email, "seo metadata saved");
    flash_success(&session, "Đã cập nhật SEO").await?;
    Ok(Redirect::to("/admin/seo"))
}
