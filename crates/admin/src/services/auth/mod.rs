//! Admin authentication service.
//!
//! Password login against `admin_users`. Only active, non-deleted accounts
//! can sign in.

mod error;

pub use error::AdminAuthError;

use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::{AdminRole, Email, PasswordError, hash_password, verify_password};
use shoop_db::models::{AdminUser, NewAdminUser};
use shoop_db::{AdminUserRepository, RepositoryError};

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: AdminUserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: AdminUserRepository::new(pool),
        }
    }

    /// Check an email and password.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` unless an active admin
    /// with that email exists and the password verifies.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminAuthError> {
        let email = Email::parse(email).map_err(|_| AdminAuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_active_with_password(&email)
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        verify_password(password, &password_hash).map_err(|e| match e {
            PasswordError::Mismatch | PasswordError::MalformedHash => {
                AdminAuthError::InvalidCredentials
            }
            _ => AdminAuthError::PasswordHash,
        })?;

        tracing::info!(admin_id = %user.id, "admin logged in");
        Ok(user)
    }

    /// Create an active admin account.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::MissingFields` for blank input,
    /// `AdminAuthError::InvalidEmail` for a malformed address and
    /// `AdminAuthError::UserAlreadyExists` if the email is taken.
    #[instrument(skip(self, password))]
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser, AdminAuthError> {
        if email.trim().is_empty() || name.trim().is_empty() || password.is_empty() {
            return Err(AdminAuthError::MissingFields);
        }

        let email = Email::parse(email)?;
        let password_hash = hash_password(password).map_err(|_| AdminAuthError::PasswordHash)?;

        self.users
            .create(&NewAdminUser {
                email,
                password_hash,
                name: name.trim().to_owned(),
                role,
                is_active: true,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::UserAlreadyExists,
                other => AdminAuthError::Repository(other),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_login() {
        let pool = shoop_db::in_memory().await.unwrap();
        let auth = AdminAuthService::new(&pool);

        let created = auth
            .create_admin("boss@occ.io.vn", "Boss", "s3cret-pass", AdminRole::SuperAdmin)
            .await
            .unwrap();
        assert_eq!(created.role, AdminRole::SuperAdmin);

        let user = auth.login(" boss@occ.io.vn ", "s3cret-pass").await.unwrap();
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let pool = shoop_db::in_memory().await.unwrap();
        let auth = AdminAuthService::new(&pool);
        auth.create_admin("staff@occ.io.vn", "Staff", "right", AdminRole::Admin)
            .await
            .unwrap();

        assert!(matches!(
            auth.login("staff@occ.io.vn", "wrong").await,
            Err(AdminAuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@occ.io.vn", "right").await,
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_admin() {
        let pool = shoop_db::in_memory().await.unwrap();
        let auth = AdminAuthService::new(&pool);
        auth.create_admin("dup@occ.io.vn", "A", "pw", AdminRole::Admin)
            .await
            .unwrap();

        assert!(matches!(
            auth.create_admin("dup@occ.io.vn", "B", "pw", AdminRole::Admin).await,
            Err(AdminAuthError::UserAlreadyExists)
        ));
    }
}
