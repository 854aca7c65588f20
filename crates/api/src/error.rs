//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"detail": "<message>"}`; server-side failures are captured to Sentry and
//! answered with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, CartError, CatalogError, CheckoutError, MediaError};

/// Message for any 5xx response.
const INTERNAL_DETAIL: &str = "Internal server error";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or wrong admin token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    /// Status code and client-facing message.
    fn status_and_detail(&self) -> (StatusCode, String) {
        let internal = || (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_DETAIL.to_string());
        let bad_request = |msg: String| (StatusCode::BAD_REQUEST, msg);

        match self {
            Self::Database(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found.".to_string())
            }
            Self::Database(_) => internal(),

            Self::Auth(err) => match err {
                AuthError::MissingFields => {
                    bad_request("Username and password are required.".to_string())
                }
                AuthError::InvalidEmail(e) => bad_request(format!("Invalid email: {e}.")),
                AuthError::DuplicateUsername => bad_request("Username already exists.".to_string()),
                AuthError::DuplicateEmail => bad_request("Email already exists.".to_string()),
                AuthError::NotFound(kind) => {
                    (StatusCode::NOT_FOUND, format!("{} not found.", kind.label()))
                }
                AuthError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string())
                }
                AuthError::Repository(_) | AuthError::PasswordHash => internal(),
            },

            Self::Cart(err) => cart_status(err).unwrap_or_else(internal),

            Self::Checkout(err) => match err {
                CheckoutError::MissingCustomer => {
                    bad_request("Name and email are required.".to_string())
                }
                CheckoutError::EmptyCart => bad_request("Cart is empty.".to_string()),
                CheckoutError::ProductUnavailable(id) => {
                    bad_request(format!("Product {id} is no longer available."))
                }
                CheckoutError::InsufficientStock {
                    product_id,
                    available,
                    ..
                } => bad_request(format!(
                    "Only {available} of product {product_id} left in stock."
                )),
                CheckoutError::Cart(err) => cart_status(err).unwrap_or_else(internal),
                CheckoutError::Repository(_) => internal(),
            },

            Self::Catalog(err) => match err {
                CatalogError::NotFound => {
                    (StatusCode::NOT_FOUND, "Product not found.".to_string())
                }
                CatalogError::Media(MediaError::Empty) => {
                    bad_request("Uploaded file is empty.".to_string())
                }
                CatalogError::Media(MediaError::Io(_)) | CatalogError::Repository(_) => internal(),
            },

            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed.".to_string(),
            ),
        }
    }
}

/// Client-visible cart failures; `None` for storage faults.
fn cart_status(err: &CartError) -> Option<(StatusCode, String)> {
    match err {
        CartError::ProductNotFound => {
            Some((StatusCode::NOT_FOUND, "Product not found.".to_string()))
        }
        CartError::OutOfStock => Some((StatusCode::BAD_REQUEST, "Out of stock.".to_string())),
        CartError::InsufficientStock { available, .. } => Some((
            StatusCode::BAD_REQUEST,
            format!("Only {available} left in stock."),
        )),
        CartError::Session(_) | CartError::Repository(_) => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(status = status.as_u16(), %detail, "request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
