//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::instrument;

use minishop_core::{Price, ProductId};

use super::extract::{JsonBody, PathParam};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminToken;
use crate::models::{NewProduct, Product, ProductChanges};
use crate::state::AppState;

/// Multipart field carrying the uploaded image.
const IMAGE_FIELD: &str = "image";

/// Product as returned by the API.
///
/// `image_url` is the image to display (upload first, then external URL);
/// `uploaded_image_url` is only the upload.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image_url: Option<String>,
    pub uploaded_image_url: Option<String>,
    pub stock: u32,
}

impl ProductResponse {
    fn new(product: Product, media_url: &str) -> Self {
        Self {
            image_url: product.display_image_url(media_url),
            uploaded_image_url: product.uploaded_image_url(media_url),
            id: product.id,
            name: product.name,
            price: product.price,
            description: product.description,
            stock: product.stock,
        }
    }
}

/// `GET /api/products`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.catalog().list().await?;
    Ok(Json(
        products
            .into_iter()
            .map(|p| ProductResponse::new(p, state.media_url()))
            .collect(),
    ))
}

/// `POST /api/products`
#[instrument(skip(state, new))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
    JsonBody(new): JsonBody<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let product = state.catalog().create(new).await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::new(product, state.media_url())),
    ))
}

/// `GET /api/products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<ProductResponse>> {
    let product = state.catalog().get(id).await?;
    Ok(Json(ProductResponse::new(product, state.media_url())))
}

/// `PUT|PATCH /api/products/{id}` - only fields present in the body change.
#[instrument(skip(state, changes))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
    PathParam(id): PathParam<ProductId>,
    JsonBody(changes): JsonBody<ProductChanges>,
) -> Result<Json<ProductResponse>> {
    let product = state.catalog().update(id, changes).await?;
    Ok(Json(ProductResponse::new(product, state.media_url())))
}

/// `DELETE /api/products/{id}`
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<Value>> {
    state.catalog().delete(id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// `POST /api/products/{id}/upload-image` (multipart field `image`)
#[instrument(skip(state, multipart))]
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: RequireAdminToken,
    PathParam(id): PathParam<ProductId>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<ProductResponse>> {
    let missing =
        || AppError::BadRequest("No file found. Send multipart field 'image'.".to_string());

    let mut multipart = multipart.map_err(|_| missing())?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?;

        let product = state
            .catalog()
            .upload_image(id, file_name.as_deref(), &bytes)
            .await?;
        return Ok(Json(ProductResponse::new(product, state.media_url())));
    }

    Err(missing())
}
