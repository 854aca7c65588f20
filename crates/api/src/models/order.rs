//! Order domain types.
//!
//! Order items are denormalized: name and unit price are copied from the
//! product at checkout and never re-synced. The order total is always derived
//! from the items.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use minishop_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId};

/// An order header (domain type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Internal sequential ID.
    pub id: OrderId,
    /// Random identifier shown to customers.
    pub public_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A line item owned by an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// Originating product; cleared when that product is deleted.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Price,
}

impl OrderItem {
    /// `quantity × price_per_unit`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price_per_unit.times(self.quantity)
    }
}

/// An order together with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderWithItems {
    /// Sum of item subtotals, computed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(OrderItem::subtotal).sum()
    }
}

/// Fields for a new order header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub public_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub estimated_delivery: Option<NaiveDate>,
}

/// Snapshot of a product taken when an order item is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Price,
}

/// Number of orders created on one calendar day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyOrderCount {
    pub date: NaiveDate,
    pub orders: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn item(quantity: u32, price: &str) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(1),
            order_id: OrderId::new(1),
            product_id: None,
            product_name: "Widget".to_owned(),
            quantity,
            price_per_unit: Price::new(Decimal::from_str(price).unwrap()).unwrap(),
        }
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let order = OrderWithItems {
            order: Order {
                id: OrderId::new(1),
                public_id: Uuid::new_v4(),
                customer_name: "Ada".to_owned(),
                customer_email: "ada@example.com".to_owned(),
                status: OrderStatus::Placed,
                estimated_delivery: None,
                created_at: Utc::now(),
            },
            items: vec![item(2, "29.99"), item(1, "79.99")],
        };
        assert_eq!(order.total().amount(), Decimal::from_str("139.97").unwrap());
    }

    #[test]
    fn test_empty_order_totals_zero() {
        let order = OrderWithItems {
            order: Order {
                id: OrderId::new(1),
                public_id: Uuid::new_v4(),
                customer_name: "Ada".to_owned(),
                customer_email: "ada@example.com".to_owned(),
                status: OrderStatus::Placed,
                estimated_delivery: None,
                created_at: Utc::now(),
            },
            items: Vec::new(),
        };
        assert_eq!(order.total(), Price::ZERO);
    }
}
