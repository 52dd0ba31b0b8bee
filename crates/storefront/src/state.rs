//! Application state shared across handlers.

use std::sync::Arc;

use mercado_core::{Catalog, PricingPolicy};

use crate::config::StorefrontConfig;
use crate::services::carts::CartBook;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the pricing policy and the cart book.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    carts: CartBook,
}

impl AppState {
    /// Create a new application state over the seeded catalog.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        Self::with_catalog(config, Catalog::seeded())
    }

    /// Create a new application state over a custom catalog.
    #[must_use]
    pub fn with_catalog(config: StorefrontConfig, catalog: Catalog) -> Self {
        let carts = CartBook::new(config.max_carts, config.cart_idle_timeout);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                carts,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// The pricing policy behind every total the storefront shows.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }

    #[must_use]
    pub fn carts(&self) -> &CartBook {
        &self.inner.carts
    }
}
