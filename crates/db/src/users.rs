//! Customer account repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::{Email, UserId};

use crate::RepositoryError;
use crate::models::{NewUser, User};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    name: String,
    phone: String,
    address: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

const COLUMNS: &str = "id, email, name, phone, address, created_at, updated_at";

/// Repository for customer accounts.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create(&self, new: &NewUser) -> Result<User, RepositoryError> {
        let id = UserId::generate();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users
                (id, email, password_hash, name, phone, address, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(&new.phone)
        .bind(&new.address)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email"))?;

        Ok(User {
            id,
            email: new.email.clone(),
            name: new.name.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a customer and their password hash by email, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn get_with_password(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(&format!(
            "SELECT {COLUMNS}, password_hash FROM users WHERE email = ? AND deleted_at IS NULL"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(|row| -> Result<_, RepositoryError> {
            Ok((User::try_from(row.user)?, row.password_hash))
        })
        .transpose()
    }

    /// List customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM users WHERE deleted_at IS NULL
             ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Count live customers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::in_memory;

    fn new_user(email: &str, name: &str) -> NewUser {
        NewUser {
            email: Email::parse(email).unwrap(),
            password_hash: "$argon2id$stub".to_owned(),
            name: name.to_owned(),
            phone: "0901234567".to_owned(),
            address: String::new(),
        }
    }

    #[tokio::test]
    async fn test_register_and_lookup() {
        let pool = in_memory().await.unwrap();
        let repo = UserRepository::new(&pool);

        let user = repo.create(&new_user("lan@occ.io.vn", "Lan")).await.unwrap();
        assert_eq!(repo.get_by_id(&user.id).await.unwrap().unwrap().name, "Lan");

        let (found, hash) = repo
            .get_with_password(&user.email)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(hash, "$argon2id$stub");
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let pool = in_memory().await.unwrap();
        let repo = UserRepository::new(&pool);

        repo.create(&new_user("lan@occ.io.vn", "Lan")).await.unwrap();
        let err = repo.create(&new_user("lan@occ.io.vn", "Lan 2")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let pool = in_memory().await.unwrap();
        let repo = UserRepository::new(&pool);

        repo.create(&new_user("a@occ.io.vn", "A")).await.unwrap();
        repo.create(&new_user("b@occ.io.vn", "B")).await.unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
