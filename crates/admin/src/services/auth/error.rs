//! Admin authentication error types.

use thiserror::Error;

use shoop_db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AdminAuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shoop_core::EmailError),

    /// Email, name or password left blank.
    #[error("email, name and password are required")]
    MissingFields,

    /// Unknown email, wrong password or disabled account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Admin user already exists.
    #[error("admin user already exists")]
    UserAlreadyExists,

    /// Hashing or verifying the password failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
