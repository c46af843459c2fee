//! Integration tests for the catalog JSON API.
//!
//! These tests require:
//! - The console running (cargo run -p order-desk-console)
//! - A commerce platform with at least one published product
//! - `ORDER_DESK_OPERATOR_KEY` in the environment
//!
//! Run with: cargo test -p order-desk-integration-tests -- --ignored

use reqwest::{Client, StatusCode, redirect};
use serde_json::Value;

fn base_url() -> String {
    std::env::var("ORDER_DESK_BASE_URL").unwrap_or_else(|_| "http://localhost:3080".to_string())
}

fn operator_key() -> String {
    std::env::var("ORDER_DESK_OPERATOR_KEY").expect("ORDER_DESK_OPERATOR_KEY must be set")
}

fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Sign in and scrape the authenticity token off the order form page.
async fn sign_in_and_get_token(client: &Client) -> String {
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .form(&[("name", "Test Operator"), ("access_key", &operator_key())])
        .send()
        .await
        .expect("Failed to post login form");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{}/", base_url()))
        .send()
        .await
        .expect("Failed to get order form")
        .text()
        .await
        .expect("Failed to read order form");

    let marker = "data-token=\"";
    let start = body.find(marker).expect("order form carries a token") + marker.len();
    let end = body[start..].find('"').expect("token attribute closes") + start;
    body[start..end].to_string()
}

#[tokio::test]
#[ignore = "Requires running console server and commerce platform"]
async fn test_search_rejects_missing_token() {
    let client = client();
    sign_in_and_get_token(&client).await;

    let resp = client
        .get(format!("{}/api/products/search?term=tee", base_url()))
        .send()
        .await
        .expect("Failed to call search API");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
#[ignore = "Requires running console server and commerce platform"]
async fn test_search_rejects_empty_term() {
    let client = client();
    let token = sign_in_and_get_token(&client).await;

    let resp = client
        .get(format!(
            "{}/api/products/search?term=&token={token}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to call search API");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Search term is required");
}

#[tokio::test]
#[ignore = "Requires running console server and commerce platform"]
async fn test_search_returns_result_envelope() {
    let client = client();
    let token = sign_in_and_get_token(&client).await;

    let resp = client
        .get(format!(
            "{}/api/products/search?term=a&token={token}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to call search API");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert!(body["results"].is_array());
}

#[tokio::test]
#[ignore = "Requires running console server and commerce platform"]
async fn test_variations_of_unknown_product_is_invalid() {
    let client = client();
    let token = sign_in_and_get_token(&client).await;

    let resp = client
        .get(format!(
            "{}/api/products/999999999/variations?token={token}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to call variations API");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid product");
}
