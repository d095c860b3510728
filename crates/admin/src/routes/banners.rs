//! Home page banner route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use shoop_core::BannerId;
use shoop_db::models::{Banner, BannerInput};
use shoop_db::{BannerRepository, Deleted, RepositoryError};

use super::{ListParams, parse_integer};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, flash_success};
use crate::services::uploads::{MultipartForm, UploadFolder};
use crate::state::AppState;

const INDEX_PATH: &str = "/admin/banners";

/// Banner row for the list page.
#[derive(Debug, Clone)]
pub struct BannerView {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub image: String,
    pub link: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub is_deleted: bool,
}

impl From<Banner> for BannerView {
    fn from(banner: Banner) -> Self {
        Self {
            id: banner.id.into_inner(),
            title: banner.title,
            subtitle: banner.subtitle,
            image: banner.image,
            link: banner.link,
            sort_order: banner.sort_order,
            is_active: banner.is_active,
            is_deleted: banner.deleted_at.is_some(),
        }
    }
}

/// Values shown in the banner form, as typed.
#[derive(Debug, Clone, Default)]
pub struct BannerFormValues {
    pub title: String,
    pub subtitle: String,
    pub link: String,
    pub sort_order: String,
    pub is_active: bool,
    /// Current image, kept when no new file is sent.
    pub image: String,
}

impl BannerFormValues {
    fn from_form(form: &MultipartForm, image: &str) -> Self {
        Self {
            title: form.text("title").to_owned(),
            subtitle: form.text("subtitle").to_owned(),
            link: form.text("link").to_owned(),
            sort_order: form.text("sort_order").to_owned(),
            is_active: form.checked("is_active"),
            image: image.to_owned(),
        }
    }

    fn from_banner(banner: &Banner) -> Self {
        Self {
            title: banner.title.clone(),
            subtitle: banner.subtitle.clone(),
            link: banner.link.clone(),
            sort_order: banner.sort_order.to_string(),
            is_active: banner.is_active,
            image: banner.image.clone(),
        }
    }

    fn to_input(&self) -> std::result::Result<BannerInput, String> {
        Ok(BannerInput {
            title: self.title.trim().to_owned(),
            subtitle: self.subtitle.trim().to_owned(),
            image: self.image.clone(),
            link: self.link.trim().to_owned(),
            sort_order: parse_integer(&self.sort_order)?,
            is_active: self.is_active,
        })
    }
}

/// Banner list template.
#[derive(Template, WebTemplate)]
#[template(path = "banners/index.html")]
pub struct BannersIndexTemplate {
    pub ctx: AdminContext,
    pub banners: Vec<BannerView>,
    pub show_deleted: bool,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "banners/form.html")]
pub struct BannerFormTemplate {
    pub ctx: AdminContext,
    pub action: String,
    pub is_new: bool,
    pub form: BannerFormValues,
}

/// GET /admin/banners
#[instrument(skip_all)]
pub async fn index(
    ctx: AdminContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<BannersIndexTemplate> {
    let banners = BannerRepository::new(state.pool())
        .list(params.deleted())
        .await?;

    Ok(BannersIndexTemplate {
        ctx: ctx.titled("Banner"),
        banners: banners.into_iter().map(BannerView::from).collect(),
        show_deleted: params.deleted() == Deleted::Include,
    })
}

/// GET /admin/banners/create
pub async fn new_form(ctx: AdminContext) -> BannerFormTemplate {
    BannerFormTemplate {
        ctx: ctx.titled("Thêm Banner"),
        action: format!("{INDEX_PATH}/create"),
        is_new: true,
        form: BannerFormValues {
            is_active: true,
            ..BannerFormValues::default()
        },
    }
}

/// POST /admin/banners/create
#[instrument(skip_all)]
pub async fn create(
    ctx: AdminContext,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form = MultipartForm::read(multipart).await?;
    let image = match form.file("image") {
        Some(file) => state.uploads().save(UploadFolder::Banners, file).await?,
        None => String::new(),
    };
    let values = BannerFormValues::from_form(&form, &image);

    let input = match values.to_input() {
        Ok(input) => input,
        Err(message) => {
            return Ok(BannerFormTemplate {
                ctx: ctx.titled("Thêm Banner").with_error(message),
                action: format!("{INDEX_PATH}/create"),
                is_new: true,
                form: values,
            }
            .into_response());
        }
    };

    let banner = BannerRepository::new(state.pool()).create(&input).await?;

    tracing::info!(banner_id = %banner.id, "banner created");
    flash_success(&session, "Đã tạo banner thành công").await?;
    Ok(Redirect::to(INDEX_PATH).into_response())
}

/// GET /admin/banners/{id}/edit
#[instrument(skip(ctx, state))]
pub async fn edit_form(
    ctx: AdminContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<BannerFormTemplate> {
    let banner = find(&state, &BannerId::new(id)).await?;

    Ok(BannerFormTemplate {
        ctx: ctx.titled("Sửa Banner"),
        action: format!("{INDEX_PATH}/{}/edit", banner.id),
        is_new: false,
        form: BannerFormValues::from_banner(&banner),
    })
}

/// POST /admin/banners/{id}/edit
///
/// Without a new file the current image is kept.
#[instrument(skip(ctx, state, session, multipart))]
pub async fn update(
    ctx: AdminContext,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let banner = find(&state, &BannerId::new(id)).await?;
    let form = MultipartForm::read(multipart).await?;
    let image = match form.file("image") {
        Some(file) => state.uploads().save(UploadFolder::Banners, file).await?,
        None => banner.image.clone(),
    };
    let values = BannerFormValues::from_form(&form, &image);

    let input = match values.to_input() {
        Ok(input) => input,
        Err(message) => {
            return Ok(BannerFormTemplate {
                ctx: ctx.titled("Sửa Banner").with_error(message),
                action: format!("{INDEX_PATH}/{}/edit", banner.id),
                is_new: false,
                form: values,
            }
            .into_response());
        }
    };

    match BannerRepository::new(state.pool()).update(&banner.id, &input).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => return Err(AppError::NotFound("banner".to_string())),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(banner_id = %banner.id, "banner updated");
    flash_success(&session, "Đã cập nhật banner").await?;
    Ok(Redirect::to(INDEX_PATH).into_response())
}

/// POST /admin/banners/{id}/delete
#[instrument(skip_all, fields(banner_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = BannerId::new(id);
    match BannerRepository::new(state.pool()).soft_delete(&id).await {
        Ok(()) | Err(RepositoryError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(banner_id = %id, admin = %admin.email, "banner deleted");
    flash_success(&session, "Đã xóa banner").await?;
    Ok(Redirect::to(INDEX_PATH))
}

async fn find(state: &AppState, id: &BannerId) -> Result<Banner> {
    BannerRepository::new(state.pool())
        .get_by_id(id, Deleted::Exclude)
        .await?
        .ok_or_else(|| AppError::NotFound("banner".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_keeps_given_image() {
        let form = MultipartForm::default()
            .with_field("title", " Khai trương ")
            .with_field("sort_order", "2")
            .with_field("is_active", "on");
        let values = BannerFormValues::from_form(&form, "/uploads/banners/old.jpg");
        let input = values.to_input().unwrap();
        assert_eq!(input.title, "Khai trương");
        assert_eq!(input.image, "/uploads/banners/old.jpg");
        assert_eq!(input.sort_order, 2);
        assert!(input.is_active);
    }

    #[test]
    fn test_bad_sort_order_rejected() {
        let form = MultipartForm::default().with_field("sort_order", "top");
        assert!(BannerFormValues::from_form(&form, "").to_input().is_err());
    }
}
