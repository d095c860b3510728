//! Session models for the storefront.
//!
//! Catalog and order models live in `shoop_db::models`.

pub mod session;

pub use session::{CurrentUser, keys as session_keys};
