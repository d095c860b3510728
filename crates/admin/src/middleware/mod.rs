//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Security headers (stricter CSP for admin)
//! 4. Session layer (tower-sessions with SQLite store, SameSite=Strict)
//!
//! Handlers take [`AdminContext`] (or [`RequireAdminAuth`]) to require a
//! signed-in admin.

pub mod auth;
pub mod context;
pub mod flash;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminAuthRejection, LOGIN_PATH, OptionalAdminAuth, RequireAdminAuth, clear_current_admin,
    set_current_admin,
};
pub use context::{AdminContext, AdminUserView};
pub use flash::{Flash, flash_error, flash_success};
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, create_session_store};
