//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (banners, featured, latest)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Catalog
//! GET  /products               - Catalog (?page, ?category, ?q)
//! GET  /products/{slug}        - Product detail
//!
//! # Account (JSON)
//! POST /register               - Create account and log in
//! POST /login                  - Log in
//! GET  /logout                 - Clear session
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add to cart (JSON, login required)
//! POST /cart/update            - Change quantity (JSON)
//! POST /checkout               - Place order (JSON, login required)
//!
//! # Pages
//! GET  /about                  - About page
//! GET  /contact                - Contact page
//! ```

pub mod auth;
pub mod cart;
pub mod home;
pub mod pages;
pub mod products;
pub mod views;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all storefront routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/update", post(cart::update))
        .route("/checkout", post(cart::checkout))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
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
