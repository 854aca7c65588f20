//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::extract::JsonBody;
use crate::error::Result;
use crate::services::CheckoutReceipt;
use crate::state::AppState;

/// Body of `POST /api/checkout`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutRequest {
    pub name: String,
    pub email: String,
}

/// `POST /api/checkout` - turn the session cart into an order.
#[instrument(skip(state, session, body), fields(customer = %body.name))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutReceipt>)> {
    let receipt = state
        .checkout()
        .checkout(&session, &body.name, &body.email)
        .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}
