//! Customer authentication service.
//!
//! Email + password accounts; hashes are Argon2id (see `shoop_core::password`).

mod error;

pub use error::AuthError;

use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::{Email, PasswordError, hash_password, verify_password};
use shoop_db::RepositoryError;
use shoop_db::UserRepository;
use shoop_db::models::{NewUser, User};

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: &'a str,
    pub address: &'a str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingFields` if name, email or password is
    /// blank, `AuthError::InvalidEmail` for a malformed address and
    /// `AuthError::UserAlreadyExists` if the email is taken.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &Registration<'_>) -> Result<User, AuthError> {
        if form.name.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty()
        {
            return Err(AuthError::MissingFields);
        }

        let email = Email::parse(form.email)?;
        let password_hash = hash_password(form.password).map_err(|_| AuthError::PasswordHash)?;

        let user = self
            .users
            .create(&NewUser {
                email,
                password_hash,
                name: form.name.trim().to_owned(),
                phone: form.phone.trim().to_owned(),
                address: form.address.trim().to_owned(),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user.id, "customer registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password does not match.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash).map_err(|e| match e {
            PasswordError::Mismatch => AuthError::InvalidCredentials,
            _ => AuthError::PasswordHash,
        })?;

        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration<'a>(email: &'a str, password: &'a str) -> Registration<'a> {
        Registration {
            name: "Nguyễn Văn A",
            email,
            password,
            ..Registration::default()
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let pool = shoop_db::in_memory().await.unwrap();
        let auth = AuthService::new(&pool);

        let user = auth
            .register(&registration("khach@example.com", "matkhau123"))
            .await
            .unwrap();
        assert_eq!(user.name, "Nguyễn Văn A");

        let logged_in = auth.login("khach@example.com", "matkhau123").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let pool = shoop_db::in_memory().await.unwrap();
        let auth = AuthService::new(&pool);
        auth.register(&registration("khach@example.com", "matkhau123"))
            .await
            .unwrap();

        assert!(matches!(
            auth.login("khach@example.com", "sai").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "matkhau123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let pool = shoop_db::in_memory().await.unwrap();
        let auth = AuthService::new(&pool);

        assert!(matches!(
            auth.register(&registration("khach@example.com", "")).await,
            Err(AuthError::MissingFields)
        ));

        auth.register(&registration("khach@example.com", "x"))
            .await
            .unwrap();
        assert!(matches!(
            auth.register(&registration("khach@example.com", "y")).await,
            Err(AuthError::UserAlreadyExists)
        ));
    }
}
