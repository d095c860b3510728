//! Admin and customer accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoop_core::{AdminRole, AdminUserId, Email, UserId};

/// A back-office account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an admin account.
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub name: String,
    pub role: AdminRole,
    pub is_active: bool,
}

/// A storefront customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for registering a customer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}
