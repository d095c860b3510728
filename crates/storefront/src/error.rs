//! Unified error handling with Sentry integration.
//!
//! Page handlers return [`AppError`]; the cart, checkout and account
//! endpoints that the storefront calls with `fetch` return [`ApiError`],
//! which renders a JSON body instead of plain text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use shoop_db::RepositoryError;

use crate::services::auth::AuthError;

/// Application-level error type for storefront pages.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        capture(&self);

        // Don't expose internal error details to clients
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Errors from the JSON endpoints (`/login`, `/register`, `/cart/*`,
/// `/checkout`).
#[derive(Debug, Error)]
pub enum ApiError {
    /// The customer must log in first. Renders `{"error":"login_required"}`.
    #[error("login required")]
    LoginRequired,

    /// A form submission was refused. Renders `{"success":false,"message":..}`.
    #[error("{0}")]
    Rejected(String),

    /// Renders `{"error":..}` with 400.
    #[error("{0}")]
    BadRequest(String),

    /// Renders `{"error":..}` with 404.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    App(#[from] AppError),
}

/// Generic message for failures the customer cannot fix.
const SYSTEM_ERROR: &str = "Lỗi hệ thống";

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        Self::App(AppError::Database(err))
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::App(AppError::Session(err))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingFields => {
                Self::Rejected("Vui lòng điền đầy đủ thông tin".to_string())
            }
            AuthError::InvalidEmail(_) => Self::Rejected("Email không hợp lệ".to_string()),
            AuthError::InvalidCredentials => {
                Self::Rejected("Email hoặc mật khẩu không đúng".to_string())
            }
            AuthError::UserAlreadyExists => Self::Rejected("Email đã được sử dụng".to_string()),
            AuthError::Repository(err) => Self::App(AppError::Database(err)),
            AuthError::PasswordHash => {
                Self::App(AppError::Internal("password hashing failed".to_string()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::LoginRequired => (StatusCode::UNAUTHORIZED, json!({ "error": "login_required" })),
            Self::Rejected(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "message": message }),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            Self::App(err) => {
                capture(&err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "success": false, "error": SYSTEM_ERROR, "message": SYSTEM_ERROR }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn capture(err: &AppError) {
    let event_id = sentry::capture_error(err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "Request error"
    );
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after login.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for customer actions.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "…")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_page_errors_hide_details() {
        let response = AppError::Internal("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Internal server error");
    }

    #[tokio::test]
    async fn test_client_errors_render_json() {
        let response = ApiError::NotFound("Sản phẩm không tồn tại".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Sản phẩm không tồn tại" })
        );

        let response = ApiError::BadRequest("Giỏ hàng trống".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, json!({ "error": "Giỏ hàng trống" }));
    }

    #[tokio::test]
    async fn test_login_required_body() {
        let response = ApiError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "login_required" }));
    }

    #[tokio::test]
    async fn test_auth_errors_become_rejections() {
        let response = ApiError::from(AuthError::UserAlreadyExists).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Email đã được sử dụng");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response = ApiError::from(AppError::Internal("disk on fire".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], SYSTEM_ERROR);
        assert!(!body.to_string().contains("disk on fire"));
    }
}
