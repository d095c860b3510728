//! Banner repository.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::BannerId;

use crate::models::{Banner, BannerInput};
use crate::{Deleted, RepositoryError};

#[derive(Debug, sqlx::FromRow)]
struct BannerRow {
    id: String,
    title: String,
    subtitle: String,
    image: String,
    link: String,
    sort_order: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<BannerRow> for Banner {
    fn from(row: BannerRow) -> Self {
        Self {
            id: BannerId::new(row.id),
            title: row.title,
            subtitle: row.subtitle,
            image: row.image,
            link: row.link,
            sort_order: row.sort_order,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

const COLUMNS: &str =
    "id, title, subtitle, image, link, sort_order, is_active, created_at, updated_at, deleted_at";

/// Repository for home page banners.
pub struct BannerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BannerRepository<'a> {
    /// Create a new banner repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List banners by `sort_order`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, deleted: Deleted) -> Result<Vec<Banner>, RepositoryError> {
        let rows = sqlx::query_as::<_, BannerRow>(&format!(
            "SELECT {COLUMNS} FROM banners
             WHERE (? OR deleted_at IS NULL)
             ORDER BY sort_order ASC, created_at ASC"
        ))
        .bind(deleted.included())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Active banners by `sort_order`, for the home page slider.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Banner>, RepositoryError> {
        let rows = sqlx::query_as::<_, BannerRow>(&format!(
            "SELECT {COLUMNS} FROM banners
             WHERE is_active = 1 AND deleted_at IS NULL
             ORDER BY sort_order ASC, created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a banner by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: &BannerId,
        deleted: Deleted,
    ) -> Result<Option<Banner>, RepositoryError> {
        let row = sqlx::query_as::<_, BannerRow>(&format!(
            "SELECT {COLUMNS} FROM banners WHERE id = ? AND (? OR deleted_at IS NULL)"
        ))
        .bind(id.as_str())
        .bind(deleted.included())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: &BannerInput) -> Result<Banner, RepositoryError> {
        let id = BannerId::generate();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO banners
                (id, title, subtitle, image, link, sort_order, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(&input.image)
        .bind(&input.link)
        .bind(input.sort_order)
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(&id, Deleted::Exclude)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a live banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner does not exist.
    #[instrument(skip(self, input), fields(id = %id))]
    pub async fn update(&self, id: &BannerId, input: &BannerInput) -> Result<Banner, RepositoryError> {
        let result = sqlx::query(
            "UPDATE banners
             SET title = ?, subtitle = ?, image = ?, link = ?, sort_order = ?, is_active = ?,
                 updated_at = ?
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(&input.image)
        .bind(&input.link)
        .bind(input.sort_order)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_by_id(id, Deleted::Exclude)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner does not exist.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn soft_delete(&self, id: &BannerId) -> Result<(), RepositoryError> {
        crate::soft_delete(self.pool, "banners", id.as_str()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::in_memory;

    fn input(title: &str, sort_order: i64, is_active: bool) -> BannerInput {
        BannerInput {
            title: title.to_owned(),
            image: format!("/uploads/banners/{sort_order}.jpg"),
            sort_order,
            is_active,
            ..BannerInput::default()
        }
    }

    #[tokio::test]
    async fn test_active_banners_in_sort_order() {
        let pool = in_memory().await.unwrap();
        let repo = BannerRepository::new(&pool);

        repo.create(&input("Second", 2, true)).await.unwrap();
        repo.create(&input("First", 1, true)).await.unwrap();
        repo.create(&input("Hidden", 0, false)).await.unwrap();

        let titles: Vec<_> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, ["First", "Second"]);
        assert_eq!(repo.list(Deleted::Exclude).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_soft_delete() {
        let pool = in_memory().await.unwrap();
        let repo = BannerRepository::new(&pool);

        let banner = repo.create(&input("Sale", 1, true)).await.unwrap();
        let updated = repo.update(&banner.id, &input("Big Sale", 3, true)).await.unwrap();
        assert_eq!(updated.title, "Big Sale");

        repo.soft_delete(&banner.id).await.unwrap();
        assert!(repo.list(Deleted::Exclude).await.unwrap().is_empty());
        assert_eq!(repo.list(Deleted::Include).await.unwrap().len(), 1);
        assert!(matches!(
            repo.update(&banner.id, &input("x", 0, true)).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
