//! Layout context for back-office pages.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use shoop_core::AdminRole;

use super::auth::RequireAdminAuth;
use super::flash::Flash;
use crate::error::AppError;
use crate::models::CurrentAdmin;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub is_super_admin: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.name.clone(),
            email: admin.email.to_string(),
            is_super_admin: admin.role == AdminRole::SuperAdmin,
        }
    }
}

/// Everything `base.html` needs: the signed-in admin, pending flash
/// messages, the page title and the path used to highlight the sidebar.
///
/// Extracting it requires a logged-in admin.
#[derive(Debug, Clone)]
pub struct AdminContext {
    pub admin_user: AdminUserView,
    pub flash: Flash,
    pub title: String,
    pub current_path: String,
}

impl AdminContext {
    /// Set the page title.
    #[must_use]
    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Show an error above the page content without a redirect.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.flash.error = Some(message.into());
        self
    }

    /// Whether the sidebar entry for `section` should be highlighted.
    #[must_use]
    pub fn is_active(&self, section: &str) -> bool {
        self.current_path == section
            || self
                .current_path
                .strip_prefix(section)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAdminAuth(admin) = RequireAdminAuth::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let flash = match parts.extensions.get::<Session>() {
            Some(session) => Flash::take(session)
                .await
                .map_err(|e| AppError::from(e).into_response())?,
            None => Flash::default(),
        };

        Ok(Self {
            admin_user: AdminUserView::from(&admin),
            flash,
            title: String::new(),
            current_path: parts.uri.path().to_owned(),
        })
    }
}
