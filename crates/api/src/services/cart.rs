//! Session cart service.
//!
//! The cart itself is a [`Cart`] value stored under one session key. This
//! service loads it through a [`CartStore`], applies the mutation rules, saves
//! it back, and renders a priced view against the live catalog.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tower_sessions::Session;

use minishop_core::{Cart, Price, ProductId};

use super::policy::StockPolicy;
use crate::db::{CatalogRepository, RepositoryError};
use crate::models::session_keys;

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Unknown product (or no product id supplied).
    #[error("product not found")]
    ProductNotFound,

    /// Product has no stock.
    #[error("out of stock")]
    OutOfStock,

    /// Requested quantity exceeds stock (strict stock policy only).
    #[error("only {available} in stock (requested {requested})")]
    InsufficientStock { requested: u32, available: u32 },

    /// Session storage failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Per-visitor cart persistence.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The stored cart, or an empty one.
    async fn load_cart(&self) -> Result<Cart, CartError>;

    /// Replace the stored cart.
    async fn save_cart(&self, cart: &Cart) -> Result<(), CartError>;

    /// Drop the stored cart.
    async fn clear_cart(&self) -> Result<(), CartError>;
}

#[async_trait]
impl CartStore for Session {
    async fn load_cart(&self) -> Result<Cart, CartError> {
        Ok(self
            .get::<Cart>(session_keys::CART)
            .await?
            .unwrap_or_default())
    }

    async fn save_cart(&self, cart: &Cart) -> Result<(), CartError> {
        self.insert(session_keys::CART, cart).await?;
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), CartError> {
        self.remove::<Cart>(session_keys::CART).await?;
        Ok(())
    }
}

/// One priced cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub subtotal: Price,
    pub image_url: Option<String>,
}

/// The cart as shown to the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Price,
}

/// Cart service.
#[derive(Clone)]
pub struct CartService {
    catalog: Arc<dyn CatalogRepository>,
    stock_policy: StockPolicy,
    media_url: String,
}

impl CartService {
    /// Create a new cart service.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        stock_policy: StockPolicy,
        media_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            stock_policy,
            media_url: media_url.into(),
        }
    }

    /// Render the stored cart with live prices.
    ///
    /// Lines whose product no longer exists are left out of the view but
    /// stay in the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` or `CartError::Repository` on storage failure.
    pub async fn view(&self, store: &dyn CartStore) -> Result<CartView, CartError> {
        let cart = store.load_cart().await?;
        self.render(&cart).await
    }

    /// Add `quantity` (at least one) of a product.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if `product_id` is absent or unknown.
    /// Returns `CartError::OutOfStock` if the product has no stock.
    /// Returns `CartError::InsufficientStock` under the strict stock policy.
    pub async fn add(
        &self,
        store: &dyn CartStore,
        product_id: Option<ProductId>,
        quantity: i64,
    ) -> Result<CartView, CartError> {
        let product_id = product_id.ok_or(CartError::ProductNotFound)?;
        let product = self
            .catalog
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        if !product.in_stock() {
            return Err(CartError::OutOfStock);
        }

        let mut cart = store.load_cart().await?;
        let requested = cart.quantity_after_add(product_id, quantity);
        if self.stock_policy == StockPolicy::Strict && requested > product.stock {
            return Err(CartError::InsufficientStock {
                requested,
                available: product.stock,
            });
        }

        cart.add(product_id, quantity);
        store.save_cart(&cart).await?;
        tracing::debug!(%product_id, quantity = requested, "cart line added");

        self.render(&cart).await
    }

    /// Overwrite a line's quantity, removing it when `quantity <= 0`.
    ///
    /// Products not already in the cart are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` or `CartError::Repository` on storage failure.
    pub async fn set_quantity(
        &self,
        store: &dyn CartStore,
        product_id: Option<ProductId>,
        quantity: i64,
    ) -> Result<CartView, CartError> {
        let mut cart = store.load_cart().await?;
        if let Some(product_id) = product_id
            && cart.set_quantity(product_id, quantity)
        {
            store.save_cart(&cart).await?;
        }
        self.render(&cart).await
    }

    /// Remove a line if present.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Session` or `CartError::Repository` on storage failure.
    pub async fn remove(
        &self,
        store: &dyn CartStore,
        product_id: Option<ProductId>,
    ) -> Result<CartView, CartError> {
        let mut cart = store.load_cart().await?;
        if let Some(product_id) = product_id
            && cart.remove(product_id)
        {
            store.save_cart(&cart).await?;
        }
        self.render(&cart).await
    }

    async fn render(&self, cart: &Cart) -> Result<CartView, CartError> {
        let mut items = Vec::with_capacity(cart.len());
        for (product_id, quantity) in cart.lines() {
            let Some(product) = self.catalog.get(product_id).await? else {
                continue;
            };
            items.push(CartLineView {
                product_id,
                image_url: product.display_image_url(&self.media_url),
                subtotal: product.price.times(quantity),
                price: product.price,
                name: product.name,
                quantity,
            });
        }

        let total = items.iter().map(|line| line.subtotal).sum();
        Ok(CartView { items, total })
    }
}
