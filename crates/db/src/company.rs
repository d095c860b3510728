//! Company info repository.
//!
//! Company info is a singleton: the oldest live row wins, and saving
//! updates it or creates it when the table is empty.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::instrument;

use shoop_core::CompanyInfoId;

use crate::RepositoryError;
use crate::models::{CompanyInfo, CompanyInfoInput};

#[derive(Debug, sqlx::FromRow)]
struct CompanyInfoRow {
    id: String,
    name: String,
    tagline: String,
    email: String,
    phone: String,
    address: String,
    logo_url: String,
    facebook_url: String,
    zalo_url: String,
    copyright: String,
}

impl From<CompanyInfoRow> for CompanyInfo {
    fn from(row: CompanyInfoRow) -> Self {
        Self {
            id: Some(CompanyInfoId::new(row.id)),
            name: row.name,
            tagline: row.tagline,
            email: row.email,
            phone: row.phone,
            address: row.address,
            logo_url: row.logo_url,
            facebook_url: row.facebook_url,
            zalo_url: row.zalo_url,
            copyright: row.copyright,
        }
    }
}

/// Repository for the company info singleton.
pub struct CompanyInfoRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompanyInfoRepository<'a> {
    /// Create a new company info repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the company info, if it has been saved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<CompanyInfo>, RepositoryError> {
        let row = sqlx::query_as::<_, CompanyInfoRow>(
            "SELECT id, name, tagline, email, phone, address, logo_url, facebook_url, zalo_url,
                    copyright
             FROM company_info
             WHERE deleted_at IS NULL
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1",
        )
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Save the company info, creating the row on first save.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the write fails.
    #[instrument(skip(self, input))]
    pub async fn save(&self, input: &CompanyInfoInput) -> Result<CompanyInfo, RepositoryError> {
        let now = Utc::now();
        let id = match self.get().await?.and_then(|info| info.id) {
            Some(id) => {
                sqlx::query(
                    "UPDATE company_info
                     SET name = ?, tagline = ?, email = ?, phone = ?, address = ?, logo_url = ?,
                         facebook_url = ?, zalo_url = ?, copyright = ?, updated_at = ?
                     WHERE id = ?",
                )
                .bind(&input.name)
                .bind(&input.tagline)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.address)
                .bind(&input.logo_url)
                .bind(&input.facebook_url)
                .bind(&input.zalo_url)
                .bind(&input.copyright)
                .bind(now)
                .bind(id.as_str())
                .execute(self.pool)
                .await?;
                id
            }
            None => {
                let id = CompanyInfoId::generate();
                sqlx::query(
                    "INSERT INTO company_info
                        (id, name, tagline, email, phone, address, logo_url, facebook_url,
                         zalo_url, copyright, created_at, updated_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(id.as_str())
                .bind(&input.name)
                .bind(&input.tagline)
                .bind(&input.email)
                .bind(&input.phone)
                .bind(&input.address)
                .bind(&input.logo_url)
                .bind(&input.facebook_url)
                .bind(&input.zalo_url)
                .bind(&input.copyright)
                .bind(now)
                .bind(now)
                .execute(self.pool)
                .await?;
                id
            }
        };

        Ok(CompanyInfo {
            id: Some(id),
            name: input.name.clone(),
            tagline: input.tagline.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            logo_url: input.logo_url.clone(),
            facebook_url: input.facebook_url.clone(),
            zalo_url: input.zalo_url.clone(),
            copyright: input.copyright.clone(),
        })
    }
}
