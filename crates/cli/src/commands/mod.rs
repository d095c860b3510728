//! Subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use std::path::Path;

use shoop_db::{DbConfig, SqlitePool};

/// Open the database and bring its schema up to date.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a migration fails.
pub async fn open(path: &Path) -> Result<SqlitePool, CommandError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    tracing::info!(path = %path.display(), "Opening database...");
    let pool = shoop_db::connect(&DbConfig::new(path)).await?;
    shoop_db::migrate(&pool).await?;
    Ok(pool)
}

/// Errors shared by the database-backed commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Could not create database directory: {0}")]
    Io(#[from] std::io::Error),
}
