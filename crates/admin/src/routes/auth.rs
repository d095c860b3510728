//! Authentication route handlers for admin.
//!
//! Email + password login; the admin identity is kept in the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{LOGIN_PATH, OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::auth::{AdminAuthError, AdminAuthService};
use crate::state::AppState;

/// Where a successful login lands.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    /// Echoed back after a failed attempt.
    pub email: String,
}

/// Login form input.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// GET /admin/login
pub async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    LoginTemplate {
        error: None,
        email: String::new(),
    }
    .into_response()
}

/// POST /admin/login
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = match AdminAuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AdminAuthError::Repository(e)) => return Err(e.into()),
        Err(AdminAuthError::PasswordHash) => {
            return Err(AppError::Internal("password verification failed".to_string()));
        }
        Err(_) => {
            tracing::warn!("admin login rejected");
            return Ok(LoginTemplate {
                error: Some("Email hoặc mật khẩu không đúng".to_string()),
                email: form.email,
            }
            .into_response());
        }
    };

    let admin = CurrentAdmin::from(user);
    set_current_admin(&session, &admin).await?;
    set_sentry_user(&admin.id, Some(admin.email.as_str()));

    Ok(Redirect::to(DASHBOARD_PATH).into_response())
}

/// GET /admin/logout
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_admin(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to(LOGIN_PATH))
}
