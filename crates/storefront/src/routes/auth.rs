//! Customer account route handlers.
//!
//! Login and registration are submitted from a modal with `fetch` and
//! answer with JSON; the page script follows the returned `redirect`.

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use shoop_db::models::User;

use crate::error::{AppError, ApiError, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_session, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Page to return to after login.
    #[serde(default)]
    pub redirect: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub redirect: String,
}

/// Successful login/registration response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub redirect: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a customer account and log it in.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = AuthService::new(state.pool())
        .register(&Registration {
            name: &form.name,
            email: &form.email,
            password: &form.password,
            phone: &form.phone,
            address: &form.address,
        })
        .await?;

    start_session(&session, &user).await?;
    Ok(Json(AuthResponse {
        success: true,
        redirect: safe_redirect(&form.redirect),
    }))
}

/// Log a customer in.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = AuthService::new(state.pool())
        .login(&form.email, &form.password)
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "customer logged in");
    Ok(Json(AuthResponse {
        success: true,
        redirect: safe_redirect(&form.redirect),
    }))
}

/// Clear the session and return home.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_session(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}

async fn start_session(session: &Session, user: &User) -> Result<(), ApiError> {
    set_current_user(
        session,
        &CurrentUser {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        },
    )
    .await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(())
}

/// Only same-site paths are followed; anything else stays on the page
/// (empty redirect).
fn safe_redirect(target: &str) -> String {
    let target = target.trim();
    if target.starts_with('/') && !target.starts_with("//") && !target.contains('\\') {
        target.to_owned()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect("/cart"), "/cart");
        assert_eq!(safe_redirect(""), "");
        assert_eq!(safe_redirect("https://evil.example"), "");
        assert_eq!(safe_redirect("//evil.example"), "");
    }
}
