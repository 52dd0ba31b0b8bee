//! Integration tests for Mercado.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (no server needed)
//! cargo test -p mercado-integration-tests
//!
//! # Live-server tests against a running storefront
//! cargo run -p mercado-storefront &
//! cargo test -p mercado-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - Full router driven in-process with `tower::ServiceExt::oneshot`
//! - `live_server` - Same flows over HTTP with `reqwest` (ignored by default)

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use mercado_core::Catalog;
use mercado_storefront::{config::StorefrontConfig, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Default base URL for live-server tests.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Base URL of a running storefront, from `STOREFRONT_BASE_URL`.
#[must_use]
pub fn live_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// In-process storefront client that keeps one shopper's session cookie.
///
/// Clone the client with [`TestClient::new_shopper`] to get a second shopper
/// on the same application.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A client over the storefront with default configuration and the
    /// seeded catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(AppState::new(StorefrontConfig::default()))
    }

    /// A client over the storefront with a custom catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::with_state(AppState::with_catalog(StorefrontConfig::default(), catalog))
    }

    fn with_state(state: AppState) -> Self {
        Self {
            app: mercado_storefront::app(state),
            cookie: None,
        }
    }

    /// Another shopper on the same application, without a session.
    #[must_use]
    pub fn new_shopper(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Whether the server has issued this shopper a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn patch(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PATCH, uri, Some(body.to_string())).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    /// Send a raw, possibly malformed, JSON body.
    pub async fn post_raw(&mut self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    /// Send a request, forwarding and capturing the session cookie.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the router fails.
    #[allow(clippy::unwrap_used)]
    pub async fn send(&mut self, method: Method, uri: &str, body: Option<String>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
