//! Order analytics.

use axum::{Json, extract::State};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdminToken;
use crate::models::DailyOrderCount;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DailyOrdersResponse {
    pub date: NaiveDate,
    pub orders: i64,
}

impl From<DailyOrderCount> for DailyOrdersResponse {
    fn from(count: DailyOrderCount) -> Self {
        Self {
            date: count.date,
            orders: count.orders,
        }
    }
}

/// `GET /api/analytics/daily-orders` - days with at least one order, oldest first.
#[instrument(skip(state))]
pub async fn daily_orders(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
) -> Result<Json<Vec<DailyOrdersResponse>>> {
    let counts = state.orders().daily_counts().await?;
    Ok(Json(counts.into_iter().map(Into::into).collect()))
}
