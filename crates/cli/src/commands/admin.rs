//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a new admin user
//! shoop-cli admin create -e admin@occ.io.vn -n "Admin Name" -p '...' -r super_admin
//!
//! # Or take the password from the environment
//! ADMIN_PASSWORD='...' shoop-cli admin create -e admin@occ.io.vn -n "Admin Name"
//! ```

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use shoop_admin::services::auth::{AdminAuthError, AdminAuthService};
use shoop_core::AdminRole;

use super::CommandError;

/// Shortest password accepted for a new admin.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: super_admin, admin")]
    InvalidRole(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Opening the database failed.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Account creation was refused.
    #[error("{0}")]
    Auth(#[from] AdminAuthError),
}

/// Create a new admin user.
///
/// # Arguments
///
/// * `path` - SQLite database file
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Login password
/// * `role` - Admin's role (`super_admin` or `admin`)
///
/// # Errors
///
/// Returns `AdminError` for an unknown role, a short password, an invalid
/// or taken email, or a database failure.
pub async fn create_user(
    path: &Path,
    email: &str,
    name: &str,
    password: &SecretString,
    role: &str,
) -> Result<(), AdminError> {
    let role = parse_role(role)?;
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let pool = super::open(path).await?;

    tracing::info!("Creating admin user: {} ({})", email, role);
    let admin = AdminAuthService::new(&pool)
        .create_admin(email, name, password.expose_secret(), role)
        .await?;
    pool.close().await;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}, Role: {}",
        admin.id,
        admin.email,
        admin.role
    );
    Ok(())
}

fn parse_role(role: &str) -> Result<AdminRole, AdminError> {
    role.trim()
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("super_admin").unwrap(), AdminRole::SuperAdmin);
        assert_eq!(parse_role(" admin ").unwrap(), AdminRole::Admin);
        assert!(matches!(parse_role("viewer"), Err(AdminError::InvalidRole(_))));
    }
}
