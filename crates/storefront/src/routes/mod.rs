//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                   - Liveness check
//!
//! # Products
//! GET    /api/products             - Catalog listing
//! GET    /api/products/{id}        - Product detail
//!
//! # Cart (scoped by session cookie)
//! GET    /api/cart                 - Items and totals
//! POST   /api/cart                 - Add item
//! PATCH  /api/cart/{product_id}    - Set quantity (<= 0 removes)
//! DELETE /api/cart/clear           - Empty the cart
//! GET    /api/cart/installments    - Installment preview
//!
//! # Checkout
//! POST   /api/checkout             - Place the order
//! ```
//!
//! Anything else falls through to the static file service.

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Json, Router,
    routing::{delete, get, patch, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/clear", delete(cart::clear))
        .route("/installments", get(cart::installments))
        .route("/{product_id}", patch(cart::update))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", product_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/checkout", post(checkout::checkout))
}

/// Liveness health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
