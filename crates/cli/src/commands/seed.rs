//! Seed the database with the demo shop.
//!
//! Each table is filled only while it is empty, so running this twice
//! changes nothing the second time.

use std::path::Path;

use tracing::info;

/// Run migrations, then the seeder.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or an insert fails.
pub async fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::open(path).await?;
    let summary = shoop_db::seed(&pool).await?;
    pool.close().await;

    if summary.is_empty() {
        info!("Nothing to seed, every table already has data");
        return Ok(());
    }

    info!("Seeding complete!");
    info!("  Default admin created: {}", summary.admin);
    info!("  Company info created: {}", summary.company);
    info!("  About page created: {}", summary.about);
    info!("  Categories inserted: {}", summary.categories);
    info!("  Products inserted: {}", summary.products);
    info!("  Banners inserted: {}", summary.banners);
    Ok(())
}
