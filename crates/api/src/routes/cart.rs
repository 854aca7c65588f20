//! Session cart route handlers.
//!
//! `GET` renders the priced cart. Mutations answer with the stored
//! `{product_id: quantity}` map rather than the priced view.

use axum::{Json, extract::State};
use serde::{Deserialize, Deserializer, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use minishop_core::{Cart, ProductId};

use super::extract::JsonBody;
use crate::error::Result;
use crate::services::{CartStore, CartView};
use crate::state::AppState;

/// Body of `POST`, `PATCH` and `DELETE /api/cart`.
#[derive(Debug, Deserialize)]
pub struct CartLineRequest {
    #[serde(default, deserialize_with = "lenient_product_id")]
    pub product_id: Option<ProductId>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Accepts `3`, `"3"` or `null`. Anything that is not a valid id reads as
/// `None`, which the service treats as an unknown product.
fn lenient_product_id<'de, D>(deserializer: D) -> std::result::Result<Option<ProductId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Other(serde_json::Value),
    }

    let id = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => i32::try_from(n).ok(),
        Raw::Text(s) => s.trim().parse::<i32>().ok(),
        Raw::Other(_) => None,
    };
    Ok(id.map(ProductId::new))
}

/// Response to a cart mutation.
#[derive(Debug, Serialize)]
pub struct CartUpdated {
    pub updated: bool,
    pub cart: Cart,
}

impl CartUpdated {
    async fn from_session(session: &Session) -> Result<Json<Self>> {
        Ok(Json(Self {
            updated: true,
            cart: session.load_cart().await?,
        }))
    }
}

/// `GET /api/cart`
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    Ok(Json(state.cart().view(&session).await?))
}

/// `POST /api/cart` - add to a line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<CartLineRequest>,
) -> Result<Json<CartUpdated>> {
    state
        .cart()
        .add(&session, body.product_id, body.quantity)
        .await?;
    CartUpdated::from_session(&session).await
}

/// `PATCH /api/cart` - overwrite a line's quantity.
#[instrument(skip(state, session))]
pub async fn set_quantity(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<CartLineRequest>,
) -> Result<Json<CartUpdated>> {
    state
        .cart()
        .set_quantity(&session, body.product_id, body.quantity)
        .await?;
    CartUpdated::from_session(&session).await
}

/// `DELETE /api/cart` - drop a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    JsonBody(body): JsonBody<CartLineRequest>,
) -> Result<Json<CartUpdated>> {
    state.cart().remove(&session, body.product_id).await?;
    CartUpdated::from_session(&session).await
}
