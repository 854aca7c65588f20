//! Checkout: turn the session cart into an order.
//!
//! Steps run in sequence without a surrounding transaction: validate input,
//! resolve cart lines against the catalog, apply policy checks, write the
//! order header, then one item plus one stock decrement per line, and finally
//! clear the cart.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use minishop_core::{OrderStatus, ProductId};

use super::cart::{CartError, CartStore};
use super::policy::{MissingProductPolicy, StockPolicy};
use crate::db::{CatalogRepository, OrderRepository, RepositoryError};
use crate::models::{NewOrder, NewOrderItem, Product};

/// Days from order placement to estimated delivery.
pub const DELIVERY_LEAD_DAYS: u64 = 5;

/// Errors from checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Customer name or email missing.
    #[error("name and email are required")]
    MissingCustomer,

    /// Nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line's product no longer exists (reject policy only).
    #[error("product {0} is no longer available")]
    ProductUnavailable(ProductId),

    /// A cart line exceeds available stock (strict stock policy only).
    #[error("only {available} of product {product_id} in stock (requested {requested})")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Cart storage failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// What the customer gets back after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub estimated_delivery: Option<NaiveDate>,
}

/// Checkout service.
#[derive(Clone)]
pub struct CheckoutService {
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
    missing_product: MissingProductPolicy,
    stock: StockPolicy,
}

impl CheckoutService {
    /// Create a new checkout service.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        missing_product: MissingProductPolicy,
        stock: StockPolicy,
    ) -> Self {
        Self {
            catalog,
            orders,
            missing_product,
            stock,
        }
    }

    /// Place an order for the contents of the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingCustomer` if name or email is blank.
    /// Returns `CheckoutError::EmptyCart` if the cart has no lines.
    /// Returns `CheckoutError::ProductUnavailable` / `CheckoutError::InsufficientStock`
    /// when a strict policy rejects a line; no order is written in that case.
    #[tracing::instrument(skip(self, store, email))]
    pub async fn checkout(
        &self,
        store: &dyn CartStore,
        name: &str,
        email: &str,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(CheckoutError::MissingCustomer);
        }

        let cart = store.load_cart().await?;
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut lines: Vec<(Product, u32)> = Vec::with_capacity(cart.len());
        for (product_id, quantity) in cart.lines() {
            match self.catalog.get(product_id).await? {
                Some(product) => {
                    if self.stock == StockPolicy::Strict && quantity > product.stock {
                        return Err(CheckoutError::InsufficientStock {
                            product_id,
                            requested: quantity,
                            available: product.stock,
                        });
                    }
                    lines.push((product, quantity));
                }
                None if self.missing_product == MissingProductPolicy::Reject => {
                    return Err(CheckoutError::ProductUnavailable(product_id));
                }
                None => {
                    tracing::warn!(%product_id, "skipping cart line for missing product");
                }
            }
        }

        let order = self
            .orders
            .create_order(NewOrder {
                public_id: Uuid::new_v4(),
                customer_name: name.to_owned(),
                customer_email: email.to_owned(),
                status: OrderStatus::Placed,
                estimated_delivery: Utc::now()
                    .date_naive()
                    .checked_add_days(Days::new(DELIVERY_LEAD_DAYS)),
            })
            .await?;

        for (product, quantity) in lines {
            self.orders
                .add_item(
                    order.id,
                    NewOrderItem {
                        product_id: Some(product.id),
                        product_name: product.name,
                        quantity,
                        price_per_unit: product.price,
                    },
                )
                .await?;
            self.catalog.decrement_stock(product.id, quantity).await?;
        }

        store.clear_cart().await?;

        tracing::info!(order_id = %order.public_id, "order placed");
        Ok(CheckoutReceipt {
            order_id: order.public_id,
            status: order.status,
            estimated_delivery: order.estimated_delivery,
        })
    }
}
