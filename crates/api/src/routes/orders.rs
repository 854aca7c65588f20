//! Admin order listing handlers.

use axum::{Json, extract::State};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use minishop_core::{OrderStatus, Price};

use super::extract::PathParam;
use crate::error::Result;
use crate::middleware::RequireAdminToken;
use crate::models::{OrderItem, OrderWithItems};
use crate::state::AppState;

/// Order as returned to admins, keyed by its public id.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub total: Price,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderItemResponse {
    pub product_name: String,
    pub quantity: u32,
    pub price_per_unit: Price,
    pub subtotal: Price,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            subtotal: item.subtotal(),
            product_name: item.product_name,
            quantity: item.quantity,
            price_per_unit: item.price_per_unit,
        }
    }
}

impl From<OrderWithItems> for OrderResponse {
    fn from(full: OrderWithItems) -> Self {
        let total = full.total();
        let order = full.order;
        Self {
            order_id: order.public_id,
            customer_name: order.customer_name,
            customer_email: order.customer_email,
            status: order.status,
            estimated_delivery: order.estimated_delivery,
            created_at: order.created_at,
            total,
            items: full.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// `GET /api/orders` - newest first.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = state.orders().list().await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// `GET /api/orders/{order_id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
    PathParam(order_id): PathParam<Uuid>,
) -> Result<Json<OrderResponse>> {
    Ok(Json(state.orders().get(order_id).await?.into()))
}
