//! Product route handlers.
//!
//! Create and edit forms are `multipart/form-data` so that images can be
//! attached; every file sent under `images` is stored and appended to the
//! product's gallery.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use shoop_core::{CategoryId, ImageId, Price, ProductId, slugify};
use shoop_db::models::{Category, NewImage, Product, ProductImage, ProductInput};
use shoop_db::{CategoryRepository, Deleted, ProductRepository, RepositoryError};

use super::{ListParams, parse_integer};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, flash_success};
use crate::services::uploads::{MultipartForm, UploadFolder};
use crate::state::AppState;

const INDEX_PATH: &str = "/admin/products";

/// Product row for the list page.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub image: Option<String>,
    pub category_name: String,
    pub price: String,
    pub original_price: Option<String>,
    pub stock: i64,
    pub is_active: bool,
    pub is_featured: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            sku: product.sku.clone(),
            image: product.primary_image().map(|image| image.url.clone()),
            category_name: product.category_name.clone().unwrap_or_default(),
            price: product.effective_price().display_vnd(),
            original_price: product
                .has_discount()
                .then(|| product.original_price.display_vnd()),
            stock: product.stock,
            is_active: product.is_active,
            is_featured: product.is_featured,
            is_deleted: product.deleted_at.is_some(),
            created_at: product.created_at,
        }
    }
}

/// A gallery image on the edit page.
#[derive(Debug, Clone)]
pub struct ImageView {
    pub id: String,
    pub url: String,
    pub alt_text: String,
    pub is_primary: bool,
}

impl From<&ProductImage> for ImageView {
    fn from(image: &ProductImage) -> Self {
        Self {
            id: image.id.to_string(),
            url: image.url.clone(),
            alt_text: image.alt_text.clone(),
            is_primary: image.is_primary,
        }
    }
}

/// An entry in the category select.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Values shown in the product form, as typed.
#[derive(Debug, Clone, Default)]
pub struct ProductFormValues {
    pub name: String,
    pub description: String,
    pub content: String,
    pub original_price: String,
    pub sale_price: String,
    pub sku: String,
    pub stock: String,
    pub category_id: String,
    pub is_active: bool,
    pub is_featured: bool,
}

impl ProductFormValues {
    fn from_form(form: &MultipartForm) -> Self {
        Self {
            name: form.text("name").to_owned(),
            description: form.text("description").to_owned(),
            content: form.text("content").to_owned(),
            original_price: form.text("original_price").to_owned(),
            sale_price: form.text("sale_price").to_owned(),
            sku: form.text("sku").to_owned(),
            stock: form.text("stock").to_owned(),
            category_id: form.text("category_id").to_owned(),
            is_active: form.checked("is_active"),
            is_featured: form.checked("is_featured"),
        }
    }

    fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            content: product.content.clone(),
            original_price: product.original_price.whole_dong().to_string(),
            sale_price: product.sale_price.whole_dong().to_string(),
            sku: product.sku.clone(),
            stock: product.stock.to_string(),
            category_id: product
                .category_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            is_active: product.is_active,
            is_featured: product.is_featured,
        }
    }

    /// Validate and build the repository input. The slug follows the name.
    fn to_input(&self) -> std::result::Result<ProductInput, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Tên sản phẩm không được để trống".to_owned());
        }
        let original_price = Price::parse_listed(&self.original_price)
            .map_err(|e| format!("Giá gốc không hợp lệ: {e}"))?;
        let sale_price = Price::parse_listed(&self.sale_price)
            .map_err(|e| format!("Giá khuyến mãi không hợp lệ: {e}"))?;
        let stock = parse_integer(&self.stock).map_err(|_| "Tồn kho phải là số".to_owned())?;

        Ok(ProductInput {
            name: name.to_owned(),
            slug: slugify(name),
            description: self.description.trim().to_owned(),
            content: self.content.trim().to_owned(),
            original_price,
            sale_price,
            sku: self.sku.trim().to_owned(),
            stock,
            category_id: Some(self.category_id.trim())
                .filter(|id| !id.is_empty())
                .map(CategoryId::new),
            is_active: self.is_active,
            is_featured: self.is_featured,
        })
    }
}

/// Product list template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub ctx: AdminContext,
    pub products: Vec<ProductRowView>,
    pub show_deleted: bool,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub ctx: AdminContext,
    pub action: String,
    pub is_new: bool,
    pub form: ProductFormValues,
    pub categories: Vec<CategoryOption>,
    pub images: Vec<ImageView>,
}

impl ProductFormTemplate {
    async fn build(
        state: &AppState,
        ctx: AdminContext,
        product: Option<&Product>,
        form: ProductFormValues,
    ) -> Result<Self> {
        let categories = CategoryRepository::new(state.pool())
            .list(Deleted::Exclude)
            .await?;

        Ok(Self {
            ctx: ctx.titled(if product.is_some() { "Sửa sản phẩm" } else { "Thêm sản phẩm" }),
            action: product.map_or_else(
                || format!("{INDEX_PATH}/create"),
                |p| format!("{INDEX_PATH}/{}/edit", p.id),
            ),
            is_new: product.is_none(),
            categories: category_options(&categories, &form.category_id),
            images: product
                .map(|p| p.images.iter().map(ImageView::from).collect())
                .unwrap_or_default(),
            form,
        })
    }
}

fn category_options(categories: &[Category], selected: &str) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|category| CategoryOption {
            id: category.id.to_string(),
            name: category.name.clone(),
            selected: category.id.as_str() == selected,
        })
        .collect()
}

/// GET /admin/products
#[instrument(skip_all)]
pub async fn index(
    ctx: AdminContext,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ProductsIndexTemplate> {
    let products = ProductRepository::new(state.pool())
        .list(params.deleted())
        .await?;

    Ok(ProductsIndexTemplate {
        ctx: ctx.titled("Sản phẩm"),
        products: products.iter().map(ProductRowView::from).collect(),
        show_deleted: params.deleted() == Deleted::Include,
    })
}

/// GET /admin/products/create
#[instrument(skip_all)]
pub async fn new_form(ctx: AdminContext, State(state): State<AppState>) -> Result<ProductFormTemplate> {
    let form = ProductFormValues {
        is_active: true,
        ..ProductFormValues::default()
    };
    ProductFormTemplate::build(&state, ctx, None, form).await
}

/// POST /admin/products/create
#[instrument(skip_all)]
pub async fn create(
    ctx: AdminContext,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form = MultipartForm::read(multipart).await?;
    let values = ProductFormValues::from_form(&form);

    let input = match values.to_input() {
        Ok(input) => input,
        Err(message) => {
            let page = ProductFormTemplate::build(&state, ctx.with_error(message), None, values);
            return Ok(page.await?.into_response());
        }
    };

    let repo = ProductRepository::new(state.pool());
    let product = match repo.create(&input).await {
        Ok(product) => product,
        Err(RepositoryError::Conflict(reason)) => {
            let message = format!("Không thể tạo sản phẩm: {reason}");
            let page = ProductFormTemplate::build(&state, ctx.with_error(message), None, values);
            return Ok(page.await?.into_response());
        }
        Err(e) => return Err(e.into()),
    };

    attach_images(&state, &product.id, &form).await?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
    flash_success(&session, "Đã tạo sản phẩm thành công").await?;
    Ok(Redirect::to(INDEX_PATH).into_response())
}

/// GET /admin/products/{id}/edit
#[instrument(skip(ctx, state))]
pub async fn edit_form(
    ctx: AdminContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ProductFormTemplate> {
    let product = find(&state, &ProductId::new(id)).await?;
    let form = ProductFormValues::from_product(&product);
    ProductFormTemplate::build(&state, ctx, Some(&product), form).await
}

/// POST /admin/products/{id}/edit
///
/// New images are appended; existing ones are removed individually.
#[instrument(skip(ctx, state, session, multipart))]
pub async fn update(
    ctx: AdminContext,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    let product = find(&state, &ProductId::new(id)).await?;
    let form = MultipartForm::read(multipart).await?;
    let values = ProductFormValues::from_form(&form);

    let input = match values.to_input() {
        Ok(input) => input,
        Err(message) => {
            let page = ProductFormTemplate::build(&state, ctx.with_error(message), Some(&product), values);
            return Ok(page.await?.into_response());
        }
    };

    match ProductRepository::new(state.pool()).update(&product.id, &input).await {
        Ok(_) => {}
        Err(RepositoryError::Conflict(reason)) => {
            let message = format!("Không thể cập nhật sản phẩm: {reason}");
            let page = ProductFormTemplate::build(&state, ctx.with_error(message), Some(&product), values);
            return Ok(page.await?.into_response());
        }
        Err(RepositoryError::NotFound) => return Err(AppError::NotFound("product".to_string())),
        Err(e) => return Err(e.into()),
    }

    attach_images(&state, &product.id, &form).await?;

    tracing::info!(product_id = %product.id, "product updated");
    flash_success(&session, "Đã cập nhật sản phẩm").await?;
    Ok(Redirect::to(INDEX_PATH).into_response())
}

/// POST /admin/products/{id}/delete
///
/// Soft delete; the product's images go with it.
#[instrument(skip_all, fields(product_id = %id))]
pub async fn delete(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = ProductId::new(id);
    match ProductRepository::new(state.pool()).soft_delete(&id).await {
        Ok(()) | Err(RepositoryError::NotFound) => {}
        Err(e) => return Err(e.into()),
    }

    tracing::info!(product_id = %id, admin = %admin.email, "product deleted");
    flash_success(&session, "Đã xóa sản phẩm").await?;
    Ok(Redirect::to(INDEX_PATH))
}

/// POST /admin/images/{id}/delete
///
/// Called with `fetch` from the edit page; answers `{"status":"ok"}`.
#[instrument(skip_all, fields(image_id = %id))]
pub async fn delete_image(
    RequireAdminAuth(_admin): RequireAdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    match ProductRepository::new(state.pool())
        .delete_image(&ImageId::new(id))
        .await
    {
        Ok(()) => Ok(Json(json!({ "status": "ok" }))),
        Err(RepositoryError::NotFound) => Err(AppError::NotFound("image".to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Store every file sent under `images` and append them to the gallery.
async fn attach_images(state: &AppState, product_id: &ProductId, form: &MultipartForm) -> Result<()> {
    let mut images = Vec::new();
    for file in form.files("images") {
        let url = state.uploads().save(UploadFolder::Products, file).await?;
        images.push(NewImage {
            url,
            alt_text: file.file_name.clone(),
        });
    }

    ProductRepository::new(state.pool())
        .add_images(product_id, &images)
        .await?;
    Ok(())
}

async fn find(state: &AppState, id: &ProductId) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get_by_id(id, Deleted::Exclude)
        .await?
        .ok_or_else(|| AppError::NotFound("product".to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn values() -> ProductFormValues {
        ProductFormValues {
            name: "Vòng tay Thạch Anh Tóc Vàng".to_owned(),
            original_price: "2500000".to_owned(),
            sale_price: "1990000".to_owned(),
            stock: "12".to_owned(),
            is_active: true,
            ..ProductFormValues::default()
        }
    }

    #[test]
    fn test_to_input_parses_prices() {
        let input = values().to_input().unwrap();
        assert_eq!(input.original_price, Price::from_dong(2_500_000));
        assert_eq!(input.sale_price, Price::from_dong(1_990_000));
        assert_eq!(input.stock, 12);
        assert_eq!(input.category_id, None);
        assert!(input.is_active);
        assert!(!input.is_featured);
    }

    #[test]
    fn test_blank_sale_price_is_zero() {
        let mut form = values();
        form.sale_price = String::new();
        form.category_id = "cat-1".to_owned();
        let input = form.to_input().unwrap();
        assert_eq!(input.sale_price, Price::ZERO);
        assert_eq!(input.category_id, Some(CategoryId::new("cat-1")));
    }

    #[test]
    fn test_to_input_rejects_bad_values() {
        let mut form = values();
        form.original_price = "-5".to_owned();
        assert!(form.to_input().is_err());

        let mut form = values();
        form.stock = "nhiều".to_owned();
        assert!(form.to_input().is_err());

        let mut form = values();
        form.name = " ".to_owned();
        assert!(form.to_input().is_err());
    }

    #[test]
    fn test_to_input_rejects_oversized_prices() {
        let mut form = values();
        form.original_price = "50000000000000000000000000000".to_owned();
        let message = form.to_input().unwrap_err();
        assert!(message.starts_with("Giá gốc không hợp lệ"));

        let mut form = values();
        form.sale_price = "1000000000001".to_owned();
        assert!(form.to_input().unwrap_err().starts_with("Giá khuyến mãi không hợp lệ"));
    }

    #[test]
    fn test_values_from_multipart() {
        let form = MultipartForm::default()
            .with_field("name", " Tỳ Hưu ")
            .with_field("original_price", "150000")
            .with_field("is_featured", "on");
        let values = ProductFormValues::from_form(&form);
        assert_eq!(values.name, "Tỳ Hưu");
        assert!(values.is_featured);
        assert!(!values.is_active);
    }
}
