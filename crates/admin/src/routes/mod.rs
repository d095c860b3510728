//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness check
//! GET  /health/ready                        - Readiness check (database)
//!
//! # Auth
//! GET  /admin/login                         - Login page
//! POST /admin/login                         - Email + password login
//! GET  /admin/logout                        - Clear session
//!
//! # Dashboard
//! GET  /admin                               - Redirect to dashboard
//! GET  /admin/dashboard                     - Counters and recent orders
//!
//! # Catalog
//! GET  /admin/categories                    - List (?deleted=include)
//! GET  /admin/categories/create             - New form
//! POST /admin/categories/create             - Create
//! GET  /admin/categories/{id}/edit          - Edit form
//! POST /admin/categories/{id}/edit          - Update
//! POST /admin/categories/{id}/delete        - Soft delete
//! GET  /admin/products                      - List (?deleted=include)
//! GET  /admin/products/create               - New form
//! POST /admin/products/create               - Create (multipart)
//! GET  /admin/products/{id}/edit            - Edit form
//! POST /admin/products/{id}/edit            - Update (multipart)
//! POST /admin/products/{id}/delete          - Soft delete
//! POST /admin/images/{id}/delete            - Remove a gallery image (JSON)
//!
//! # Orders and customers
//! GET  /admin/orders                        - List (?status=)
//! GET  /admin/orders/{id}                   - Detail
//! POST /admin/orders/{id}/status            - Change status
//! GET  /admin/users                         - Customer list
//! GET  /admin/users/{id}                    - Customer and their orders
//!
//! # Content
//! GET  /admin/banners                       - List (?deleted=include)
//! GET  /admin/banners/create                - New form
//! POST /admin/banners/create                - Create (multipart)
//! GET  /admin/banners/{id}/edit             - Edit form
//! POST /admin/banners/{id}/edit             - Update (multipart)
//! POST /admin/banners/{id}/delete           - Soft delete
//! GET  /admin/company                       - Company information
//! POST /admin/company                       - Save company information
//! GET  /admin/about                         - About page
//! POST /admin/about                         - Save about page
//! GET  /admin/seo                           - SEO overview
//! GET  /admin/seo/{page}                    - SEO form
//! POST /admin/seo/{page}                    - Save SEO metadata
//! ```

pub mod auth;
pub mod banners;
pub mod categories;
pub mod content;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod seo;
pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use shoop_db::Deleted;

use crate::state::AppState;

/// Create all admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Auth
        .route("/admin/login", get(auth::login_page).post(auth::login))
        .route("/admin/logout", get(auth::logout))
        // Dashboard
        .route("/admin", get(dashboard::index))
        .route("/admin/dashboard", get(dashboard::dashboard))
        // Categories
        .route("/admin/categories", get(categories::index))
        .route(
            "/admin/categories/create",
            get(categories::new_form).post(categories::create),
        )
        .route(
            "/admin/categories/{id}/edit",
            get(categories::edit_form).post(categories::update),
        )
        .route("/admin/categories/{id}/delete", post(categories::delete))
        // Products
        .route("/admin/products", get(products::index))
        .route(
            "/admin/products/create",
            get(products::new_form).post(products::create),
        )
        .route(
            "/admin/products/{id}/edit",
            get(products::edit_form).post(products::update),
        )
        .route("/admin/products/{id}/delete", post(products::delete))
        .route("/admin/images/{id}/delete", post(products::delete_image))
        // Orders
        .route("/admin/orders", get(orders::index))
        .route("/admin/orders/{id}", get(orders::show))
        .route("/admin/orders/{id}/status", post(orders::update_status))
        // Customers
        .route("/admin/users", get(users::index))
        .route("/admin/users/{id}", get(users::show))
        // Banners
        .route("/admin/banners", get(banners::index))
        .route(
            "/admin/banners/create",
            get(banners::new_form).post(banners::create),
        )
        .route(
            "/admin/banners/{id}/edit",
            get(banners::edit_form).post(banners::update),
        )
        .route("/admin/banners/{id}/delete", post(banners::delete))
        // Site content
        .route(
            "/admin/company",
            get(content::company).post(content::save_company),
        )
        .route("/admin/about", get(content::about).post(content::save_about))
        .route("/admin/seo", get(seo::index))
        .route("/admin/seo/{page}", get(seo::edit_form).post(seo::save))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if shoop_db::health_check(state.pool()).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// List query: `?deleted=include` also shows soft-deleted rows.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub deleted: Option<String>,
}

impl ListParams {
    fn deleted(&self) -> Deleted {
        match self.deleted.as_deref() {
            Some("include") => Deleted::Include,
            _ => Deleted::Exclude,
        }
    }
}

/// Parse a whole number from a form field; blank means zero.
fn parse_integer(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| format!("'{raw}' không phải là số nguyên"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("").unwrap(), 0);
        assert_eq!(parse_integer(" 7 ").unwrap(), 7);
        assert_eq!(parse_integer("-2").unwrap(), -2);
        assert!(parse_integer("abc").is_err());
    }

    #[test]
    fn test_list_params_deleted_scope() {
        let params = |v: Option<&str>| ListParams {
            deleted: v.map(str::to_owned),
        };
        assert_eq!(params(None).deleted(), Deleted::Exclude);
        assert_eq!(params(Some("include")).deleted(), Deleted::Include);
        assert_eq!(params(Some("yes")).deleted(), Deleted::Exclude);
    }
}
