//! Persistence for the Minishop API.
//!
//! # Storage backends
//!
//! Every store is a trait object so the HTTP layer does not care where data
//! lives:
//!
//! - `PostgreSQL` (`shop` schema), the default. Migrations are in
//!   `crates/api/migrations/` and run via `minishop migrate`.
//! - An in-process [`MemoryDatabase`] used by tests and `MINISHOP_STORAGE=memory`.
//!
//! ## Tables
//!
//! - `product` - Catalog
//! - `customer_order` / `order_item` - Orders with denormalized line items
//! - `customer` / `admin_user` - Two independent credential namespaces

pub mod catalog;
pub mod credentials;
pub mod memory;
pub mod orders;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;
use uuid::Uuid;

use minishop_core::{Email, OrderId, PrincipalKind, ProductId};

pub use catalog::PgCatalogRepository;
pub use credentials::PgCredentialRepository;
pub use memory::MemoryDatabase;
pub use orders::PgOrderRepository;

use crate::models::{
    Account, DailyOrderCount, NewAccount, NewOrder, NewOrderItem, NewProduct, Order, OrderItem,
    OrderWithItems, Product, ProductChanges, StoredCredential,
};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation; carries the constraint name.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(db_err.constraint().unwrap_or_default().to_owned());
    }
    RepositoryError::Database(err)
}

/// Catalog storage.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All products, ascending by ID.
    async fn list(&self) -> Result<Vec<Product>, RepositoryError>;

    /// A single product.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product and return it with its assigned ID.
    async fn create(&self, new: NewProduct) -> Result<Product, RepositoryError>;

    /// Apply a partial update.
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError>;

    /// Record the media-relative path of an uploaded image.
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn set_uploaded_image(
        &self,
        id: ProductId,
        path: &str,
    ) -> Result<Product, RepositoryError>;

    /// Delete a product. Order items referencing it keep their snapshot and
    /// lose the product reference. Returns whether a row was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Reduce stock by `quantity`, flooring at zero.
    async fn decrement_stock(&self, id: ProductId, quantity: u32)
    -> Result<(), RepositoryError>;
}

/// Order storage.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert an order header.
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError>;

    /// Append an item to an existing order.
    async fn add_item(
        &self,
        order_id: OrderId,
        item: NewOrderItem,
    ) -> Result<OrderItem, RepositoryError>;

    /// All orders with their items, newest first.
    async fn list(&self) -> Result<Vec<OrderWithItems>, RepositoryError>;

    /// A single order by its public identifier.
    async fn get_by_public_id(
        &self,
        public_id: Uuid,
    ) -> Result<Option<OrderWithItems>, RepositoryError>;

    /// Orders per UTC calendar day, ascending, only days with orders.
    async fn daily_counts(&self) -> Result<Vec<DailyOrderCount>, RepositoryError>;
}

/// Credential storage for both account namespaces.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Look up an account and its password hash by exact username.
    async fn find_by_username(
        &self,
        kind: PrincipalKind,
        username: &str,
    ) -> Result<Option<StoredCredential>, RepositoryError>;

    /// Whether an account of this kind already uses `email`.
    async fn email_exists(&self, kind: PrincipalKind, email: &Email)
    -> Result<bool, RepositoryError>;

    /// Insert an account.
    ///
    /// Returns `RepositoryError::Conflict` with the violated constraint name
    /// when the username or email is taken.
    async fn insert(
        &self,
        kind: PrincipalKind,
        new: NewAccount,
    ) -> Result<Account, RepositoryError>;

    /// All accounts of a kind, ascending by ID.
    async fn list(&self, kind: PrincipalKind) -> Result<Vec<Account>, RepositoryError>;
}

/// The set of stores the application runs against.
#[derive(Clone)]
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub credentials: Arc<dyn CredentialRepository>,
}

impl Repositories {
    /// Stores backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            catalog: Arc::new(PgCatalogRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            credentials: Arc::new(PgCredentialRepository::new(pool)),
        }
    }

    /// Stores backed by a fresh, empty in-process database.
    #[must_use]
    pub fn in_memory() -> Self {
        let db = Arc::new(MemoryDatabase::default());
        Self {
            catalog: db.clone(),
            orders: db.clone(),
            credentials: db,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Run the bundled schema migrations.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
