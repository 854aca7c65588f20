//! Integration tests for Minishop.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the API against a migrated database (or MINISHOP_STORAGE=memory)
//! cargo run -p minishop-api
//!
//! # Run the ignored integration tests
//! MINISHOP_TEST_URL=http://127.0.0.1:8000 ADMIN_TOKEN=... \
//!     cargo test -p minishop-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - Catalog, cart and checkout as a customer would use them
//! - `admin_endpoints` - Token-gated catalog writes, orders and analytics

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Connection details for a running API server.
pub struct TestContext {
    /// Client with a cookie store, so the session cart persists across calls.
    pub client: Client,
    /// Base URL, without trailing slash.
    pub base_url: String,
    admin_token: SecretString,
}

impl TestContext {
    /// Build a context from `MINISHOP_TEST_URL` and `ADMIN_TOKEN`.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("MINISHOP_TEST_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let admin_token = std::env::var("ADMIN_TOKEN").unwrap_or_default();

        Self {
            client: Self::new_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            admin_token: SecretString::from(admin_token),
        }
    }

    /// A fresh cookie-carrying client, i.e. a new visitor.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new_client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for an API path such as `/api/cart`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// The admin token to send in [`ADMIN_TOKEN_HEADER`].
    #[must_use]
    pub fn admin_token(&self) -> &str {
        self.admin_token.expose_secret()
    }

    /// Create a product through the admin API and return its JSON.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is not answered with 201.
    pub async fn create_product(&self, name: &str, price: f64, stock: u32) -> Value {
        let resp = self
            .client
            .post(self.url("/api/products"))
            .header(ADMIN_TOKEN_HEADER, self.admin_token())
            .json(&serde_json::json!({ "name": name, "price": price, "stock": stock }))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), reqwest::StatusCode::CREATED);
        resp.json().await.expect("Invalid product JSON")
    }
}

/// A username unlikely to collide with earlier runs.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", uuid::Uuid::new_v4().simple())
}
