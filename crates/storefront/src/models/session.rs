//! Session-related types.
//!
//! Everything the storefront keeps in the session: the logged-in customer,
//! the cart and one-shot flash messages.

use serde::{Deserialize, Serialize};

use shoop_core::{Email, UserId};

/// Session-stored customer identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Customer's database ID.
    pub id: UserId,
    pub email: Email,
    /// Display name shown in the header.
    pub name: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the JSON cart (`shoop_core::Cart`).
    pub const CART: &str = "cart";

    /// One-shot success message shown on the next page.
    pub const FLASH_SUCCESS: &str = "flash_success";

    /// One-shot error message shown on the next page.
    pub const FLASH_ERROR: &str = "flash_error";
}
