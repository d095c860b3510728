//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID
//! 4. Security headers
//! 5. Session layer (tower-sessions with SQLite store)
//!
//! Per-handler extractors sit on top: [`SiteContext`] for page layout,
//! [`RequireAuth`] / [`OptionalAuth`] for customer identity.

pub mod auth;
pub mod context;
pub mod flash;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_session, set_current_user};
pub use context::SiteContext;
pub use flash::{Flash, flash_error, flash_success};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, create_session_store};
