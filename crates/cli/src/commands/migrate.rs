//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! shoop-cli migrate
//! shoop-cli --db /var/lib/shoop/shoop.db migrate
//! ```
//!
//! Migrations are embedded from `crates/db/migrations/`; both web binaries
//! also apply them at startup.

use std::path::Path;

use super::CommandError;

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a migration fails.
pub async fn run(path: &Path) -> Result<(), CommandError> {
    let pool = super::open(path).await?;
    pool.close().await;

    tracing::info!("Migrations complete!");
    Ok(())
}
