//! End-to-end shopping flow against a running API server.
//!
//! These tests require:
//! - The API server running (cargo run -p minishop-api)
//! - `ADMIN_TOKEN` matching the server's token
//!
//! Run with: cargo test -p minishop-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use minishop_core::OrderStatus;
use minishop_integration_tests::{TestContext, unique_name};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health() {
    let ctx = TestContext::from_env();
    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .send()
        .await
        .expect("Failed to reach server");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_cart_to_checkout() {
    let ctx = TestContext::from_env();
    let product = ctx.create_product(&unique_name("widget"), 12.5, 10).await;
    let product_id = product["id"].as_i64().unwrap();

    let resp = ctx
        .client
        .post(ctx.url("/api/cart/"))
        .json(&json!({ "product_id": product_id, "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["cart"][product_id.to_string()], 3);

    // The cookie store carries the session to the next request.
    let cart: Value = ctx
        .client
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["total"], json!(37.5));

    let resp = ctx
        .client
        .post(ctx.url("/api/checkout"))
        .json(&json!({ "name": "Integration Test", "email": "it@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let receipt: Value = resp.json().await.unwrap();
    assert_eq!(receipt["status"], OrderStatus::Placed.as_str());
    assert!(receipt["order_id"].is_string());

    let product: Value = ctx
        .client
        .get(ctx.url(&format!("/api/products/{product_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(product["stock"], 7);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_new_visitor_gets_empty_cart() {
    let ctx = TestContext::from_env();
    let product = ctx.create_product(&unique_name("gadget"), 5.0, 10).await;

    ctx.client
        .post(ctx.url("/api/cart"))
        .json(&json!({ "product_id": product["id"] }))
        .send()
        .await
        .unwrap();

    let stranger = TestContext::new_client();
    let cart: Value = stranger
        .get(ctx.url("/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_signup_then_login() {
    let ctx = TestContext::from_env();
    let username = unique_name("shopper");
    let credentials = json!({ "username": username, "password": "s3cret-pass" });

    let resp = ctx
        .client
        .post(ctx.url("/api/user/signup"))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .client
        .post(ctx.url("/api/user/login"))
        .json(&credentials)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}
