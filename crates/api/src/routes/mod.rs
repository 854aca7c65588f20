//! HTTP route handlers for the JSON API.
//!
//! # Route Structure
//!
//! All routes below are nested under `/api`; a trailing slash is accepted.
//!
//! ```text
//! # Catalog
//! GET    /products                   - Product listing
//! POST   /products                   - Create product (admin token)
//! GET    /products/{id}              - Product detail
//! PUT    /products/{id}              - Update product (admin token)
//! PATCH  /products/{id}              - Update product (admin token)
//! DELETE /products/{id}              - Delete product (admin token)
//! POST   /products/{id}/upload-image - Upload image, multipart field `image` (admin token)
//!
//! # Cart (session)
//! GET    /cart                       - Priced cart view
//! POST   /cart                       - Add to a line
//! PATCH  /cart                       - Set a line's quantity
//! DELETE /cart                       - Remove a line
//!
//! # Checkout
//! POST   /checkout                   - Place an order from the cart
//!
//! # Orders (admin token)
//! GET    /orders                     - All orders, newest first
//! GET    /orders/{order_id}          - One order by public id
//! GET    /analytics/daily-orders     - Orders per day
//!
//! # Accounts
//! POST   /user/signup                - Customer signup
//! POST   /user/login                 - Customer login
//! POST   /admin/login                - Admin login
//! ```
//!
//! Every route also answers `OPTIONS` with `{"ok": true}` and any other
//! method with a JSON 405.

pub mod analytics;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod extract;
pub mod orders;
pub mod products;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{MethodRouter, get, post},
};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::state::AppState;

/// Upper bound for image uploads.
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route(
            "/products",
            endpoint(get(products::index).post(products::create)),
        )
        .route(
            "/products/{id}",
            endpoint(
                get(products::show)
                    .put(products::update)
                    .patch(products::update)
                    .delete(products::destroy),
            ),
        )
        .route(
            "/products/{id}/upload-image",
            endpoint(post(products::upload_image)).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Cart
        .route(
            "/cart",
            endpoint(
                get(cart::show)
                    .post(cart::add)
                    .patch(cart::set_quantity)
                    .delete(cart::remove),
            ),
        )
        .route("/checkout", endpoint(post(checkout::checkout)))
        // Admin reporting
        .route("/orders", endpoint(get(orders::index)))
        .route("/orders/{order_id}", endpoint(get(orders::show)))
        .route(
            "/analytics/daily-orders",
            endpoint(get(analytics::daily_orders)),
        )
        // Accounts
        .route("/user/signup", endpoint(post(auth::signup)))
        .route("/user/login", endpoint(post(auth::user_login)))
        .route("/admin/login", endpoint(post(auth::admin_login)))
}

/// Add the shared `OPTIONS` answer and JSON 405 to a route.
fn endpoint(route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.options(preflight).fallback(method_not_allowed)
}

async fn preflight() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// JSON 404 for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound("Not found.".to_string())
}
