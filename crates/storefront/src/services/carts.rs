//! Session-scoped cart storage.
//!
//! Carts live in memory only, keyed by the UUID held in the shopper's session.
//! Each cart sits behind its own async mutex: every operation holds it for the
//! whole read-modify-write, so concurrent requests on one cart serialize while
//! different carts never contend.

use std::sync::Arc;
use std::time::Duration;

use mercado_core::{
    Cart, CartError, CartTotals, Catalog, CheckoutError, CheckoutRequest, LineItem, Orchestrator,
    Order, PricingPolicy, ProductId, QuantityUpdate,
};
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Identifies a cart within the book.
pub type CartKey = Uuid;

type SharedCart = Arc<Mutex<Cart>>;

/// Point-in-time view of a cart and its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

/// In-memory carts, evicted when idle.
#[derive(Clone)]
pub struct CartBook {
    carts: Cache<CartKey, SharedCart>,
}

impl CartBook {
    /// Create a book holding at most `max_carts`, evicting carts idle for
    /// `idle_timeout`.
    #[must_use]
    pub fn new(max_carts: u64, idle_timeout: Duration) -> Self {
        let carts = Cache::builder()
            .max_capacity(max_carts)
            .time_to_idle(idle_timeout)
            .build();
        Self { carts }
    }

    /// Add a catalog product to the cart, creating the cart if needed.
    ///
    /// # Errors
    ///
    /// Returns the [`CartError`] from the ledger; the cart is unchanged.
    pub async fn add(
        &self,
        key: CartKey,
        catalog: &Catalog,
        product_id: ProductId,
        qty: i64,
    ) -> Result<LineItem, CartError> {
        let cart = self
            .carts
            .get_with(key, async { Arc::new(Mutex::new(Cart::new())) })
            .await;
        let mut cart = cart.lock().await;
        let item = cart.add(catalog, product_id, qty)?.clone();
        debug!(cart = %key, product_id = %product_id, qty = item.qty, "Cart line added");
        Ok(item)
    }

    /// Set a line's quantity. A missing cart reports [`QuantityUpdate::NoOp`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityTooLarge`] on overflow.
    pub async fn set_quantity(
        &self,
        key: CartKey,
        product_id: ProductId,
        qty: i64,
    ) -> Result<QuantityUpdate, CartError> {
        let Some(cart) = self.carts.get(&key).await else {
            return Ok(QuantityUpdate::NoOp);
        };
        let mut cart = cart.lock().await;
        cart.set_quantity(product_id, qty)
    }

    /// Empty the cart.
    pub async fn clear(&self, key: CartKey) {
        if let Some(cart) = self.carts.get(&key).await {
            cart.lock().await.clear();
        }
    }

    /// Lines and totals of the cart, empty if it does not exist.
    pub async fn summary(&self, key: Option<CartKey>, policy: &PricingPolicy) -> CartSummary {
        let items = match key {
            Some(key) => match self.carts.get(&key).await {
                Some(cart) => cart.lock().await.snapshot(),
                None => Vec::new(),
            },
            None => Vec::new(),
        };
        let totals = policy.totals_for(&items);
        CartSummary { items, totals }
    }

    /// Check out the cart under its lock.
    ///
    /// Validation, order construction and clearing happen in one critical
    /// section, so a cart can be checked out at most once.
    ///
    /// # Errors
    ///
    /// Returns the [`CheckoutError`] that rejected the run; the cart is
    /// unchanged.
    pub async fn checkout(
        &self,
        key: Option<CartKey>,
        policy: &PricingPolicy,
        request: &CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let cart = match key {
            Some(key) => self.carts.get(&key).await,
            None => None,
        };
        let Some(cart) = cart else {
            return Orchestrator::new(policy).run(&mut Cart::new(), request);
        };
        let mut cart = cart.lock().await;
        Orchestrator::new(policy).run(&mut cart, request)
    }

    /// Number of carts currently held.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.carts.entry_count()
    }

    /// Whether no carts are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CartBook {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(2 * 60 * 60))
    }
}
