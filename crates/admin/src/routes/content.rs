//! Company information and About page editors.
//!
//! Both are single-record forms: the first save creates the row, later
//! saves overwrite it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shoop_db::models::{AboutPageInput, CompanyInfoInput};
use shoop_db::{AboutPageRepository, CompanyInfoRepository};

use crate::error::Result;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, flash_success};
use crate::state::AppState;

/// Company information form, also used to render current values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompanyForm {
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

impl From<&CompanyForm> for CompanyInfoInput {
    fn from(form: &CompanyForm) -> Self {
        Self {
            name: form.name.trim().to_owned(),
            tagline: form.tagline.trim().to_owned(),
            email: form.email.trim().to_owned(),
            phone: form.phone.trim().to_owned(),
            address: form.address.trim().to_owned(),
            logo_url: form.logo_url.trim().to_owned(),
            facebook_url: form.facebook_url.trim().to_owned(),
            zalo_url: form.zalo_url.trim().to_owned(),
            copyright: form.copyright.trim().to_owned(),
        }
    }
}

/// About page form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AboutForm {
    pub title: String,
    /// HTML rendered as-is on the storefront.
    pub content: String,
    pub image: String,
}

/// Company information template.
#[derive(Template, WebTemplate)]
#[template(path = "company.html")]
pub struct CompanyTemplate {
    pub ctx: AdminContext,
    pub form: CompanyForm,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub ctx: AdminContext,
    pub form: AboutForm,
}

/// GET /admin/company
#[instrument(skip_all)]
pub async fn company(ctx: AdminContext, State(state): State<AppState>) -> Result<CompanyTemplate> {
    let info = CompanyInfoRepository::new(state.pool())
        .get()
        .await?
        .unwrap_or_default();

    Ok(CompanyTemplate {
        ctx: ctx.titled("Thông tin công ty"),
        form: CompanyForm {
            name: info.name,
            tagline: info.tagline,
            email: info.email,
            phone: info.phone,
            address: info.address,
            logo_url: info.logo_url,
            facebook_url: info.facebook_url,
            zalo_url: info.zalo_url,
            copyright: info.copyright,
        },
    })
}

/// POST /admin/company
#[instrument(skip_all)]
pub async fn save_company(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CompanyForm>,
) -> Result<Redirect> {
    CompanyInfoRepository::new(state.pool())
        .save(&CompanyInfoInput::from(&form))
        .await?;

    tracing::info!(admin = %admin.email, "company info saved");
    flash_success(&session, "Đã cập nhật thông tin công ty").await?;
    Ok(Redirect::to("/admin/company"))
}

/// GET /admin/about
#[instrument(skip_all)]
pub async fn about(ctx: AdminContext, State(state): State<AppState>) -> Result<AboutTemplate> {
    let page = AboutPageRepository::new(state.pool())
        .get()
        .await?
        .unwrap_or_default();

    Ok(AboutTemplate {
        ctx: ctx.titled("Trang Giới thiệu"),
        form: AboutForm {
            title: page.title,
            content: page.content,
            image: page.image,
        },
    })
}

/// POST /admin/about
#[instrument(skip_all)]
pub async fn save_about(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AboutForm>,
) -> Result<Redirect> {
    let input = AboutPageInput {
        title: form.title.trim().to_owned(),
        content: form.content,
        image: form.image.trim().to_owned(),
    };
    AboutPageRepository::new(state.pool()).save(&input).await?;

    tracing::info!(admin = %admin.email, "about page saved");
    flash_success(&session, "Đã cập nhật trang giới thiệu").await?;
    Ok(Redirect::to("/admin/about"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_input_trims() {
        let form = CompanyForm {
            name: " OCC.IO.VN ".to_owned(),
            phone: "0909 000 000 ".to_owned(),
            ..CompanyForm::default()
        };
        let input = CompanyInfoInput::from(&form);
        assert_eq!(input.name, "OCC.IO.VN");
        assert_eq!(input.phone, "0909 000 000");
        assert_eq!(input.email, "");
    }
}
