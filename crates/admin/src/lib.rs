//! Shoop Admin library.
//!
//! The back-office: catalog, orders, banners and site content for the
//! storefront, served under `/admin`. The binary in `main.rs` wires
//! configuration, logging and the database around [`app`]; integration
//! tests call [`app`] directly against an in-memory database.
//!
//! # Security
//!
//! Every page except the login form requires an admin session. The session
//! cookie is `SameSite=Strict` and `Secure` in production.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::services::uploads::MAX_IMAGE_BYTES;
use crate::state::AppState;

/// Largest request body: a product form with a handful of full-size images.
const MAX_BODY_BYTES: usize = 8 * MAX_IMAGE_BYTES;

/// Build the admin router with its full middleware stack.
///
/// Creates the session table if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the session store cannot be initialized.
pub async fn app(state: AppState) -> Result<Router, sqlx::Error> {
    let store = middleware::create_session_store(state.pool()).await?;
    let session_layer = middleware::create_session_layer(store, state.config());
    let static_dir = ServeDir::new(&state.config().static_dir);
    let upload_dir = ServeDir::new(&state.config().upload_dir);

    Ok(Router::new()
        .merge(routes::routes())
        .nest_service("/static", static_dir)
        .nest_service("/uploads", upload_dir)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::config::AdminConfig;

    async fn test_app() -> Router {
        let pool = shoop_db::in_memory().await.unwrap();
        app(AppState::new(AdminConfig::for_tests(), pool)).await.unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pages_redirect_to_login() {
        let response = test_app()
            .await
            .oneshot(Request::get("/admin/orders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn test_security_headers_applied() {
        let response = test_app()
            .await
            .oneshot(Request::get("/admin/login").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("content-security-policy"));
    }
}
