//! Live-server tests over HTTP.
//!
//! These need a storefront listening at `STOREFRONT_BASE_URL`
//! (default `http://127.0.0.1:8080`) and are ignored by default.

#![allow(clippy::unwrap_used)]

use mercado_integration_tests::live_base_url;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

fn client() -> Client {
    Client::builder().cookie_store(true).build().unwrap()
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_health() {
    let base = live_base_url();
    let response = client().get(format!("{base}/health")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_cart_flow() {
    let base = live_base_url();
    let client = client();

    let response = client
        .post(format!("{base}/api/cart"))
        .json(&json!({ "product_id": 1, "qty": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cart: Value = client
        .get(format!("{base}/api/cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cart["items"][0]["qty"], 2);
    assert_eq!(cart["subtotal_cents"], 1700);

    let response = client
        .patch(format!("{base}/api/cart/1"))
        .json(&json!({ "qty": 0 }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["outcome"], "removed");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_checkout() {
    let base = live_base_url();
    let client = client();

    client
        .post(format!("{base}/api/cart"))
        .json(&json!({ "product_id": 1, "qty": 3 }))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{base}/api/checkout"))
        .json(&json!({
            "customer_name": "Teste",
            "customer_email": "teste@exemplo.com",
            "payment": { "method": "pix" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let order: Value = response.json().await.unwrap();
    assert_eq!(order["total_cents"], 3550);
    assert_eq!(order["payment_method"], "pix");

    let response = client
        .post(format!("{base}/api/checkout"))
        .json(&json!({ "customer_email": "teste@exemplo.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
