//! About page repository. Same singleton rules as company info.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::AboutPageId;

use crate::RepositoryError;
use crate::models::{AboutPage, AboutPageInput};

#[derive(Debug, sqlx::FromRow)]
struct AboutPageRow {
    id: String,
    title: String,
    content: String,
    image: String,
}

impl From<AboutPageRow> for AboutPage {
    fn from(row: AboutPageRow) -> Self {
        Self {
            id: Some(AboutPageId::new(row.id)),
            title: row.title,
            content: row.content,
            image: row.image,
        }
    }
}

/// Repository for the about page singleton.
pub struct AboutPageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AboutPageRepository<'a> {
    /// Create a new about page repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the about page, if it has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<AboutPage>, RepositoryError> {
        let row = sqlx::query_as::<_, AboutPageRow>(
            "SELECT id, title, content, image FROM about_pages
             WHERE deleted_at IS NULL
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Save the about page, creating the row on first save.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, input))]
    pub async fn save(&self, input: &AboutPageInput) -> Result<AboutPage, RepositoryError> {
        let now = Utc::now();
        let id = if let Some(id) = self.get().await?.and_then(|page| page.id) {
            sqlx::query(
                "UPDATE about_pages SET title = ?, content = ?, image = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image)
            .bind(now)
            .bind(id.as_str())
            .execute(self.pool)
            .await?;
            id
        } else {
            let id = AboutPageId::generate();
            sqlx::query(
                "INSERT INTO about_pages (id, title, content, image, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(id.as_str())
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image)
            .bind(now)
            .bind(now)
            .execute(self.pool)
            .await?;
            id
        };

        Ok(AboutPage {
            id: Some(id),
            title: input.title.clone(),
            content: input.content.clone(),
            image: input.image.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::in_memory;

    #[tokio::test]
    async fn test_save_and_get() {
        let pool = in_memory().await.unwrap();
        let repo = AboutPageRepository::new(&pool);

        repo.save(&AboutPageInput {
            title: "Về Chúng Tôi".to_owned(),
            content: "<p>Xin chào</p>".to_owned(),
            image: String::new(),
        })
        .await
        .unwrap();
        repo.save(&AboutPageInput {
            title: "Giới thiệu".to_owned(),
            content: "<p>Xin chào</p>".to_owned(),
            image: "/uploads/about.jpg".to_owned(),
        })
        .await
        .unwrap();

        let page = repo.get().await.unwrap().unwrap();
        assert_eq!(page.title, "Giới thiệu");
        assert_eq!(page.image, "/uploads/about.jpg");
    }
}
