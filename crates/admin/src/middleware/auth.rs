//! Back-office session extractors.
//!
//! The admin identity lives in the session under
//! [`session_keys::CURRENT_ADMIN`]; it is written at login and removed at
//! logout.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// Login page every unauthenticated request is sent to.
pub const LOGIN_PATH: &str = "/admin/login";

/// The logged-in admin, or a rejection.
///
/// Pages redirect to [`LOGIN_PATH`]; the image endpoint, which the edit
/// page calls with `fetch`, answers 401 so the script can react.
pub struct RequireAdminAuth(pub CurrentAdmin);

#[derive(Debug)]
pub enum AdminAuthRejection {
    RedirectToLogin,
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(OptionalAdminAuth(admin)) = OptionalAdminAuth::from_request_parts(parts, state).await;

        admin.map(Self).ok_or_else(|| {
            if parts.uri.path().starts_with("/admin/images/") {
                AdminAuthRejection::Unauthorized
            } else {
                AdminAuthRejection::RedirectToLogin
            }
        })
    }
}

/// The logged-in admin if there is one. Used by the login page.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };
        // An unreadable session counts as logged out.
        let admin = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
            .unwrap_or_default();

        Ok(Self(admin))
    }
}

/// Store the logged-in admin, rotating the session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Forget the logged-in admin.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}
