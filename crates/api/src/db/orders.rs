//! Order repository backed by `PostgreSQL`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use minishop_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId};

use super::{OrderRepository, RepositoryError};
use crate::models::{DailyOrderCount, NewOrder, NewOrderItem, Order, OrderItem, OrderWithItems};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    public_id: Uuid,
    customer_name: String,
    customer_email: String,
    status: OrderStatus,
    estimated_delivery: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            public_id: row.public_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            status: row.status,
            estimated_delivery: row.estimated_delivery,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    quantity: i32,
    price_per_unit: Decimal,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "invalid quantity on order item {}: {}",
                row.id, row.quantity
            ))
        })?;
        let price_per_unit = Price::new(row.price_per_unit).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price on order item {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            quantity,
            price_per_unit,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DailyCountRow {
    day: NaiveDate,
    orders: i64,
}

const ORDER_COLUMNS: &str =
    "id, public_id, customer_name, customer_email, status, estimated_delivery, created_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, quantity, price_per_unit";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load items for a set of orders and attach them in input order.
    async fn with_items(&self, orders: Vec<Order>) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();

        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM shop.order_item WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            let item = OrderItem::try_from(row)?;
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create_order(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO shop.customer_order
                (public_id, customer_name, customer_email, status, estimated_delivery)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new.public_id)
        .bind(&new.customer_name)
        .bind(&new.customer_email)
        .bind(new.status)
        .bind(new.estimated_delivery)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn add_item(
        &self,
        order_id: OrderId,
        item: NewOrderItem,
    ) -> Result<OrderItem, RepositoryError> {
        let quantity = i32::try_from(item.quantity).map_err(|_| {
            RepositoryError::Conflict(format!("quantity out of range: {}", item.quantity))
        })?;

        let row = sqlx::query_as::<_, OrderItemRow>(&format!(
            r"
            INSERT INTO shop.order_item
                (order_id, product_id, product_name, quantity, price_per_unit)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(order_id)
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(quantity)
        .bind(item.price_per_unit.amount())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn list(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.with_items(rows.into_iter().map(Order::from).collect())
            .await
    }

    async fn get_by_public_id(
        &self,
        public_id: Uuid,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM shop.customer_order WHERE public_id = $1"
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.with_items(vec![row.into()]).await?.pop())
    }

    async fn daily_counts(&self) -> Result<Vec<DailyOrderCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, DailyCountRow>(
            r"
            SELECT (created_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS orders
            FROM shop.customer_order
            GROUP BY day
            ORDER BY day
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| DailyOrderCount {
                date: row.day,
                orders: row.orders,
            })
            .collect())
    }
}
