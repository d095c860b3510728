//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shoop_core::{CategoryId, slugify};
use shoop_db::models::{Category, CategoryInput};
use shoop_db::{CategoryRepository, Deleted, RepositoryError};

use super::{ListParams, parse_integer};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, flash_success};
use crate::state::AppState;

const INDEX_PATH: &str = "/admin/categories";

/// Category row for the list page.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub image: String,
    pub sort_order: i64,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into_inner(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            image: category.image,
            sort_order: category.sort_order,
            is_active: category.is_active,
            is_deleted: category.deleted_at.is_some(),
            created_at: category.created_at,
        }
    }
}

/// Submitted category form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sort_order: String,
    /// Checkbox; present only when ticked.
    pub is_active: Option<String>,
}

impl CategoryForm {
    fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            image: category.image.clone(),
            sort_order: category.sort_order.to_string(),
            is_active: category.is_active.then(|| "on".to_owned()),
        }
    }

    fn active(&self) -> bool {
        self.is_active.is_some()
    }

    /// Validate and build the repository input. The slug follows the name.
    fn to_input(&self) -> std::result::Result<CategoryInput, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Tên danh mục không được để trống".to_owned());
        }
        Ok(CategoryInput {
            name: name.to_owned(),
            slug: slugify(name),
            description: self.description.trim().to_owned(),
            image: self.image.trim().to_owned(),
            sort_order: parse_integer(&self.sort_order)?,
            is_active: self.active(),
        })
    }
}

/// Category list template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub ctx: AdminContext,
    pub categories: Vec<CategoryView>,
    pub show_deleted: bool,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    pub ctx: AdminContext,
    pub action: String,
    pub is_new: bool,
    pub form: CategoryForm,
}

/// GET /admin/categories
#[instrument(skip_all)]
pub async fn index(
    ctx: AdminContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<CategoriesIndexTemplate> {
    let categories = CategoryRepository::new(state.pool())
        .list(params.deleted())
        .await?;

    Ok(CategoriesIndexTemplate {
        ctx: ctx.titled("Danh mục"),
        categories: categories.into_iter().map(CategoryView::from).collect(),
        show_deleted: params.deleted() == Deleted::Include,
    })
}

/// GET /admin/categories/create
pub async fn new_form(ctx: AdminContext) -> CategoryFormTemplate {
    CategoryFormTemplate {
        ctx: ctx.titled("Thêm danh mục"),
        action: format!("{INDEX_PATH}/create"),
        is_new: true,
        form: CategoryForm {
            is_active: Some("on".to_owned()),
            ..CategoryForm::default()
        },
    }
}

/// POST /admin/categories/create
#[instrument(skip_all)]
pub async fn create(
    ctx: AdminContext,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let rerender = |ctx: AdminContext, form: CategoryForm, message: String| CategoryFormTemplate {
        ctx: ctx.titled("Thêm danh mục").with_error(message),
        action: format!("{INDEX_PATH}/create"),
        is_new: true,
        form,
    };

    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => return Ok(rerender(ctx, form, message).into_response()),
    };

    match CategoryRepository::new(state.pool()).create(&input).await {
        Ok(category) => {
            tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
            flash_success(&session, "Đã tạo danh mục thành công").await?;
            Ok(Redirect::to(INDEX_PATH).into_response())
        }
        Err(RepositoryError::Conflict(reason)) => {
            let message = format!("Không thể tạo danh mục: {reason}");
            Ok(rerender(ctx, form, message).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /admin/categories/{id}/edit
#[instrument(skip(ctx, state))]
pub async fn edit_form(
    ctx: AdminContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<CategoryFormTemplate> {
    let category = find(&state, &CategoryId::new(id)).await?;

    Ok(CategoryFormTemplate {
        ctx: ctx.titled("Sửa danh mục"),
        action: format!("{INDEX_PATH}/{}/edit", category.id),
        is_new: false,
        form: CategoryForm::from_category(&category),
    })
}

/// POST /admin/categories/{id}/edit
#[instrument(skip(ctx, state, session, form))]
pub async fn update(
    ctx: AdminContext,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let id = CategoryId::new(id);
    let rerender = |ctx: AdminContext, form: CategoryForm, message: String| CategoryFormTemplate {
        ctx: ctx.titled("Sửa danh mục").with_error(message),
        action: format!("{INDEX_PATH}/{id}/edit"),
        is_new: false,
        form,
    };

    let input = match form.to_input() {
        Ok(input) => input,
        Err(message) => return Ok(rerender(ctx, form, message).into_response()),
    };

    match CategoryRepository::new(state.pool()).update(&id, &input).await {
        Ok(_) => {
            tracing::info!(category_id = %id, "category updated");
            flash_success(&session, "Đã cập nhật danh mục").await?;
            Ok(Redirect::to(INDEX_PATH).into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound("category".to_string())),
        Err(RepositoryError::Conflict(reason)) => {
            let message = format!("Không thể cập nhật danh mục: {reason}");
            Ok(rerender(ctx, form, message).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /admin/categories/{id}/delete
///
/// Soft delete; products keep their `category_id`.
#[instrument(skip_all, fields(category_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = CategoryId::new(id);
    match CategoryRepository::new(state.pool()).soft_delete(&id).await {
        Ok(()) | Err(RepositoryError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(category_id = %id, admin = %admin.email, "category deleted");
    flash_success(&session, "Đã xóa danh mục").await?;
    Ok(Redirect::to(INDEX_PATH))
}

async fn find(state: &AppState, id: &CategoryId) -> Result<Category> {
    CategoryRepository::new(state.pool())
        .get_by_id(id, Deleted::Exclude)
        .await?
        .ok_or_else(|| AppError::NotFound("category".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, sort_order: &str, active: bool) -> CategoryForm {
        CategoryForm {
            name: name.to_owned(),
            description: "  Đá phong thủy tự nhiên ".to_owned(),
            image: String::new(),
            sort_order: sort_order.to_owned(),
            is_active: active.then(|| "on".to_owned()),
        }
    }

    #[test]
    fn test_to_input_derives_slug() {
        let input = form("Vòng Tay", "3", true).to_input().unwrap();
        assert_eq!(input.name, "Vòng Tay");
        assert_eq!(input.slug, slugify("Vòng Tay"));
        assert_eq!(input.description, "Đá phong thủy tự nhiên");
        assert_eq!(input.sort_order, 3);
        assert!(input.is_active);
    }

    #[test]
    fn test_to_input_defaults() {
        let input = form("Tượng", "", false).to_input().unwrap();
        assert_eq!(input.sort_order, 0);
        assert!(!input.is_active);
    }

    #[test]
    fn test_to_input_rejects_blank_name_and_bad_order() {
        assert!(form("   ", "1", true).to_input().is_err());
        assert!(form("Tượng", "first", true).to_input().is_err());
    }
}
