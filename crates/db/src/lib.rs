//! SQLite persistence for Shoop.
//!
//! # Tables
//!
//! - `admin_users`, `users` - back-office and customer accounts
//! - `categories`, `products`, `images` - the catalog
//! - `orders`, `order_items` - checkout results with price snapshots
//! - `banners`, `company_info`, `about_pages`, `seo_banners` - site content
//!
//! Every table carries `created_at`, `updated_at` and a nullable
//! `deleted_at`. Deleting through a repository only sets `deleted_at`; list
//! and lookup methods hide those rows unless called with [`Deleted::Include`].
//!
//! # Migrations
//!
//! Migrations live in `crates/db/migrations/` and are embedded at compile
//! time. They run at application startup and via:
//! ```bash
//! cargo run -p shoop-cli -- migrate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod about;
pub mod admin_users;
pub mod banners;
pub mod categories;
pub mod company;
pub mod models;
pub mod orders;
pub mod pool;
pub mod products;
pub mod seed;
pub mod seo;
pub mod users;

use thiserror::Error;

pub use about::AboutPageRepository;
pub use admin_users::AdminUserRepository;
pub use banners::BannerRepository;
pub use categories::CategoryRepository;
pub use company::CompanyInfoRepository;
pub use orders::OrderRepository;
pub use pool::{DbConfig, connect, health_check, in_memory, migrate};
pub use products::ProductRepository;
pub use seed::{SeedError, SeedSummary, seed};
pub use seo::SeoBannerRepository;
pub use sqlx::SqlitePool;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint failure to `Conflict`, keeping other errors.
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(err)
    }
}

/// Whether a query should see soft-deleted rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deleted {
    /// Hide rows with `deleted_at` set.
    #[default]
    Exclude,
    /// Return live and soft-deleted rows alike.
    Include,
}

impl Deleted {
    /// Value bound to the `(? OR deleted_at IS NULL)` guard in queries.
    pub(crate) const fn included(self) -> bool {
        matches!(self, Self::Include)
    }
}

/// Set `deleted_at` on a live row of `table`.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no live row has that id.
pub(crate) async fn soft_delete(
    executor: impl sqlx::SqliteExecutor<'_>,
    table: &'static str,
    id: &str,
) -> Result<(), RepositoryError> {
    let now = chrono::Utc::now();
    let result = sqlx::query(&format!(
        "UPDATE {table} SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL"
    ))
    .bind(now)
    .bind(now)
    .bind(id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound);
    }
    Ok(())
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matching rows across all pages.
    pub total: i64,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    /// `ceil(total / per_page)`, zero for an empty result.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 || self.total <= 0 {
            return 0;
        }
        let total = u64::try_from(self.total).unwrap_or(0);
        let pages = total.div_ceil(u64::from(self.per_page));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page = |total| Page::<()> {
            items: Vec::new(),
            total,
            page: 1,
            per_page: 12,
        };
        assert_eq!(page(0).total_pages(), 0);
        assert_eq!(page(1).total_pages(), 1);
        assert_eq!(page(12).total_pages(), 1);
        assert_eq!(page(13).total_pages(), 2);
        assert_eq!(page(25).total_pages(), 3);
    }

    #[test]
    fn test_deleted_scope_default_excludes() {
        assert_eq!(Deleted::default(), Deleted::Exclude);
        assert!(!Deleted::Exclude.included());
        assert!(Deleted::Include.included());
    }
}
