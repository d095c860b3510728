//! Connection pool and migrations.
//!
//! File databases run in WAL mode with foreign keys enforced and a five
//! second busy timeout, so concurrent writers from the storefront and the
//! back-office wait for each other instead of failing immediately.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{debug, info};

/// Migrations embedded from `crates/db/migrations`.
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const MEMORY_PATH: &str = ":memory:";

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub path: PathBuf,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub busy_timeout: Duration,
}

impl DbConfig {
    /// Configuration for a database file, created if missing.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(10),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Configuration for an isolated in-memory database.
    ///
    /// Each SQLite connection to `:memory:` sees its own database, so the
    /// pool is pinned to a single connection that is never recycled.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the maximum number of connections.
    #[must_use]
    pub const fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Whether this configuration points at an in-memory database.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path == Path::new(MEMORY_PATH)
    }
}

/// Open a connection pool.
///
/// The parent directory of a file database is created if needed.
///
/// # Errors
///
/// Returns `sqlx::Error` if the directory cannot be created or the
/// connection cannot be established.
pub async fn connect(config: &DbConfig) -> Result<SqlitePool, sqlx::Error> {
    info!(path = %config.path.display(), "Opening database");

    if config.is_in_memory() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);

        return SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await;
    }

    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(sqlx::Error::Io)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    debug!("Connection options configured");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await?;

    info!(max_connections = config.max_connections, "Database pool created");
    Ok(pool)
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the applied history does
/// not match the embedded migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), MigrateError> {
    info!(
        migrations = MIGRATOR.migrations.len(),
        "Running database migrations"
    );
    MIGRATOR.run(pool).await?;
    info!("Migrations complete");
    Ok(())
}

/// Whether the database answers a trivial query.
pub async fn health_check(pool: &SqlitePool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}

/// Open and migrate an in-memory database.
///
/// # Errors
///
/// Returns an error if the pool cannot be opened or migrations fail.
pub async fn in_memory() -> Result<SqlitePool, Box<dyn std::error::Error + Send + Sync>> {
    let pool = connect(&DbConfig::in_memory()).await?;
    migrate(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let pool = in_memory().await.unwrap();
        assert!(health_check(&pool).await);

        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'products'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 1);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = in_memory().await.unwrap();
        migrate(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_database_creates_directory() {
        let dir = std::env::temp_dir().join(format!("shoop-db-{}", std::process::id()));
        let path = dir.join("nested").join("shoop.db");
        let pool = connect(&DbConfig::new(&path)).await.unwrap();
        migrate(&pool).await.unwrap();
        assert!(path.exists());
        pool.close().await;
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db").max_connections(3);
        assert_eq!(config.max_connections, 3);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
