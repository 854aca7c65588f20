//! Order history and analytics.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{DailyOrderCount, OrderWithItems};

/// Read-side order service.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// All orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn list(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        self.orders.list().await
    }

    /// One order by public identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this identifier.
    pub async fn get(&self, public_id: Uuid) -> Result<OrderWithItems, RepositoryError> {
        self.orders
            .get_by_public_id(public_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Order counts per UTC day, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn daily_counts(&self) -> Result<Vec<DailyOrderCount>, RepositoryError> {
        self.orders.daily_counts().await
    }
}
