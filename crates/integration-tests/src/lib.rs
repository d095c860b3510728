//! Integration tests for Shoop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shoop-integration-tests
//! ```
//!
//! Each test boots the storefront and the back-office on ephemeral loopback
//! ports, both backed by one seeded in-memory database, and drives them over
//! HTTP with a cookie-keeping client.
//!
//! # Test Categories
//!
//! - `storefront` - Registration, cart and checkout
//! - `admin` - Login, catalog and content management, order status

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;

use reqwest::Client;
use reqwest::redirect::Policy;
use shoop_db::SqlitePool;

pub use shoop_db::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};

/// Both applications running against a shared database.
pub struct TestContext {
    /// Client that keeps cookies and does not follow redirects.
    pub client: Client,
    pub storefront_url: String,
    pub admin_url: String,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Seed a fresh in-memory database and start both servers.
    pub async fn new() -> Self {
        let pool = shoop_db::in_memory()
            .await
            .expect("Failed to open in-memory database");
        shoop_db::seed(&pool).await.expect("Failed to seed database");

        let storefront = shoop_storefront::app(shoop_storefront::state::AppState::new(
            shoop_storefront::config::StorefrontConfig::for_tests(),
            pool.clone(),
        ))
        .await
        .expect("Failed to build storefront");

        let admin = shoop_admin::app(shoop_admin::state::AppState::new(
            shoop_admin::config::AdminConfig::for_tests(),
            pool.clone(),
        ))
        .await
        .expect("Failed to build admin");

        let storefront_addr = serve(storefront).await;
        let admin_addr = serve(admin).await;

        Self {
            client: new_client(),
            storefront_url: format!("http://{storefront_addr}"),
            admin_url: format!("http://{admin_addr}"),
            pool,
        }
    }

    #[must_use]
    pub fn storefront(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    #[must_use]
    pub fn admin(&self, path: &str) -> String {
        format!("{}{path}", self.admin_url)
    }

    /// Log the client in to the back-office with the seeded account.
    pub async fn login_admin(&self) {
        let resp = self
            .client
            .post(self.admin("/admin/login"))
            .form(&[
                ("email", DEFAULT_ADMIN_EMAIL),
                ("password", DEFAULT_ADMIN_PASSWORD),
            ])
            .send()
            .await
            .expect("Failed to log in");
        assert_eq!(location(&resp), "/admin/dashboard", "admin login failed");
    }

    /// Register a storefront customer, leaving the client logged in.
    pub async fn register_customer(&self, email: &str) {
        let resp = self
            .client
            .post(self.storefront("/register"))
            .form(&[
                ("name", "Nguyen Van A"),
                ("email", email),
                ("password", "matkhau123"),
                ("phone", "0909000000"),
                ("address", "1 Le Loi, Q1"),
            ])
            .send()
            .await
            .expect("Failed to register");
        assert!(resp.status().is_success(), "registration failed: {}", resp.status());
    }
}

/// A cookie-keeping client that reports redirects instead of following them.
#[must_use]
pub fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// The `Location` header of a redirect, or an empty string.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

async fn serve(app: axum::Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    addr
}
