//! Per-page SEO metadata repository.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::{SeoBannerId, SeoPage};

use crate::RepositoryError;
use crate::models::{SeoBanner, SeoBannerInput};

#[derive(Debug, sqlx::FromRow)]
struct SeoBannerRow {
    id: String,
    page: String,
    title: String,
    description: String,
    keywords: String,
    og_image: String,
}

impl TryFrom<SeoBannerRow> for SeoBanner {
    type Error = RepositoryError;

    fn try_from(row: SeoBannerRow) -> Result<Self, Self::Error> {
        let page: SeoPage = row
            .page
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;

        Ok(Self {
            id: Some(SeoBannerId::new(row.id)),
            page,
            title: row.title,
            description: row.description,
            keywords: row.keywords,
            og_image: row.og_image,
        })
    }
}

/// Repository for storefront SEO metadata.
pub struct SeoBannerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SeoBannerRepository<'a> {
    /// Create a new SEO repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the saved metadata for a page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get(&self, page: SeoPage) -> Result<Option<SeoBanner>, RepositoryError> {
        let row = sqlx::query_as::<_, SeoBannerRow>(
            "SELECT id, page, title, description, keywords, og_image FROM seo_banners
             WHERE page = ? AND deleted_at IS NULL",
        )
        .bind(page.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Metadata for every page, with empty entries for unsaved pages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(&self) -> Result<Vec<SeoBanner>, RepositoryError> {
        let rows = sqlx::query_as::<_, SeoBannerRow>(
            "SELECT id, page, title, description, keywords, og_image FROM seo_banners
             WHERE deleted_at IS NULL",
        )
        .fetch_all(self.pool)
        .await?;

        let mut saved = rows
            .into_iter()
            .map(SeoBanner::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SeoPage::ALL
            .into_iter()
            .map(|page| {
                saved
                    .iter()
                    .position(|seo| seo.page == page)
                    .map_or_else(|| SeoBanner::empty(page), |pos| saved.swap_remove(pos))
            })
            .collect())
    }

    /// Create or replace the metadata for a page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, input), fields(page = %page))]
    pub async fn save(
        &self,
        page: SeoPage,
        input: &SeoBannerInput,
    ) -> Result<SeoBanner, RepositoryError> {
        let now = Utc::now();
        let id = if let Some(id) = self.get(page).await?.and_then(|seo| seo.id) {
            sqlx::query(
                "UPDATE seo_banners
                 SET title = ?, description = ?, keywords = ?, og_image = ?, updated_at = ?
                 WHERE id = ?",
            )
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.keywords)
            .bind(&input.og_image)
            .bind(now)
            .bind(id.as_str())
            .execute(self.pool)
            .await?;
            id
        } else {
            let id = SeoBannerId::generate();
            sqlx::query(
                "INSERT INTO seo_banners
                    (id, page, title, description, keywords, og_image, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(id.as_str())
            .bind(page.as_str())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.keywords)
            .bind(&input.og_image)
            .bind(now)
            .bind(now)
            .execute(self.pool)
            .await
            .map_err(|e| RepositoryError::from_insert(e, "seo page"))?;
            id
        };

        Ok(SeoBanner {
            id: Some(id),
            page,
            title: input.title.clone(),
            description: input.description.clone(),
            keywords: input.keywords.clone(),
            og_image: input.og_image.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pool::in_memory;

    #[tokio::test]
    async fn test_list_fills_unsaved_pages() {
        let pool = in_memory().await.unwrap();
        let repo = SeoBannerRepository::new(&pool);

        repo.save(
            SeoPage::About,
            &SeoBannerInput {
                title: "Về OCC".to_owned(),
                ..SeoBannerInput::default()
            },
        )
        .await
        .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), SeoPage::ALL.len());
        let pages: Vec<_> = all.iter().map(|seo| seo.page).collect();
        assert_eq!(pages, SeoPage::ALL);

        let about = all.iter().find(|seo| seo.page == SeoPage::About).unwrap();
        assert_eq!(about.title, "Về OCC");
        assert!(all.iter().find(|seo| seo.page == SeoPage::Home).unwrap().id.is_none());
    }

    #[tokio::test]
    async fn test_save_upserts() {
        let pool = in_memory().await.unwrap();
        let repo = SeoBannerRepository::new(&pool);

        let first = repo
            .save(SeoPage::Home, &SeoBannerInput::default())
            .await
            .unwrap();
        let second = repo
            .save(
                SeoPage::Home,
                &SeoBannerInput {
                    keywords: "phong thủy".to_owned(),
                    ..SeoBannerInput::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(
            repo.get(SeoPage::Home).await.unwrap().unwrap().keywords,
            "phong thủy"
        );
        assert!(repo.get(SeoPage::Contact).await.unwrap().is_none());
    }
}
