//! One-shot flash messages shown after a redirect.

use tower_sessions::Session;

use crate::models::session_keys;

/// Queue a success message for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn flash_success(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::FLASH_SUCCESS, message.into())
        .await
}

/// Queue an error message for the next page.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn flash_error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH_ERROR, message.into()).await
}

/// Messages removed from the session for rendering.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl Flash {
    /// Take both messages out of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn take(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(Self {
            success: session.remove::<String>(session_keys::FLASH_SUCCESS).await?,
            error: session.remove::<String>(session_keys::FLASH_ERROR).await?,
        })
    }

    /// Flash carrying an inline error, for forms re-rendered in place.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: None,
            error: Some(message.into()),
        }
    }
}
