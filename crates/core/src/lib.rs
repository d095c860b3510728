//! Shoop Core - Shared domain types.
//!
//! This crate provides the types used across all Shoop components:
//! - `storefront` - Customer-facing shop
//! - `admin` - Back-office for catalog, orders and content
//! - `db` - SQLite persistence layer
//! - `cli` - Migrations, seeding and admin account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no database access,
//! no HTTP. The session cart lives here because its merge rules are plain data
//! manipulation shared by handlers and tests.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails and statuses
//! - [`cart`] - The session-held shopping cart
//! - [`slug`] - URL slug generation
//! - [`password`] - Password hashing and verification
//! - [`text`] - Truncation and date formatting for templates

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod password;
pub mod slug;
pub mod text;
pub mod types;

pub use cart::{Cart, CartAction, CartItem};
pub use password::{PasswordError, hash_password, verify_password};
pub use slug::slugify;
pub use types::*;
