//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::Repositories;
use crate::middleware::AdminGate;
use crate::services::{
    AuthService, CartService, CatalogService, CheckoutService, MediaStorage, OrderService,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    pool: Option<PgPool>,
    gate: AdminGate,
    auth: AuthService,
    catalog: CatalogService,
    cart: CartService,
    checkout: CheckoutService,
    orders: OrderService,
}

impl AppState {
    /// Build state and services over a set of repositories.
    ///
    /// `pool` is only used for readiness checks; pass `None` for in-memory storage.
    #[must_use]
    pub fn new(config: ApiConfig, repos: Repositories, pool: Option<PgPool>) -> Self {
        let media = MediaStorage::new(config.media_root.clone());

        Self {
            inner: Arc::new(AppStateInner {
                gate: AdminGate::new(config.admin_token.clone()),
                auth: AuthService::new(repos.credentials.clone()),
                catalog: CatalogService::new(repos.catalog.clone(), media),
                cart: CartService::new(
                    repos.catalog.clone(),
                    config.stock_policy,
                    config.media_url.clone(),
                ),
                checkout: CheckoutService::new(
                    repos.catalog.clone(),
                    repos.orders.clone(),
                    config.missing_product_policy,
                    config.stock_policy,
                ),
                orders: OrderService::new(repos.orders),
                config,
                pool,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// The database pool, when running on `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// The admin token gate.
    #[must_use]
    pub fn gate(&self) -> &AdminGate {
        &self.inner.gate
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    #[must_use]
    pub fn cart(&self) -> &CartService {
        &self.inner.cart
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// URL prefix for uploaded media.
    #[must_use]
    pub fn media_url(&self) -> &str {
        &self.inner.config.media_url
    }
}
