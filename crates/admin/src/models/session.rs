//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use shoop_core::{AdminRole, AdminUserId, Email};
use shoop_db::models::AdminUser;

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    pub email: Email,
    /// Display name shown in the sidebar.
    pub name: String,
    pub role: AdminRole,
}

impl From<AdminUser> for CurrentAdmin {
    fn from(user: AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
        }
    }
}

/// Session keys for the back-office.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    pub const FLASH_SUCCESS: &str = "flash_success";

    pub const FLASH_ERROR: &str = "flash_error";
}
