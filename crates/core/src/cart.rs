//! Cart ledger: line items keyed by product.
//!
//! The ledger owns every mutation of a cart and keeps the line-total
//! invariant: after any successful operation each line satisfies
//! `line_total_cents == qty * unit_price_cents`, and no line holds a
//! quantity below one. A failed operation leaves the cart untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Product};
use crate::types::{Cents, ProductId};

/// Errors raised by cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product id is not in the catalog.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// A quantity below one was supplied where one is required.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i64),

    /// The quantity or line total does not fit the integer range.
    #[error("quantity {qty} for product {product_id} is too large")]
    QuantityTooLarge { product_id: ProductId, qty: i64 },
}

/// One product's aggregated quantity within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Product name copied at add-time.
    pub name: String,
    /// Unit price snapshotted at add-time.
    pub unit_price_cents: Cents,
    pub qty: u32,
    pub line_total_cents: Cents,
}

impl LineItem {
    fn new(product: &Product, qty: u32) -> Result<Self, CartError> {
        let line_total_cents = line_total(product.id, product.unit_price_cents, qty)?;
        Ok(Self {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.unit_price_cents,
            qty,
            line_total_cents,
        })
    }

    fn set_qty(&mut self, qty: u32) -> Result<(), CartError> {
        self.line_total_cents = line_total(self.product_id, self.unit_price_cents, qty)?;
        self.qty = qty;
        Ok(())
    }
}

fn line_total(product_id: ProductId, unit_price: Cents, qty: u32) -> Result<Cents, CartError> {
    unit_price
        .checked_mul(qty)
        .ok_or(CartError::QuantityTooLarge {
            product_id,
            qty: i64::from(qty),
        })
}

/// Outcome of [`Cart::set_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUpdate {
    /// The line now holds the requested quantity.
    Updated,
    /// The line was removed.
    Removed,
    /// Nothing matched; the cart is unchanged.
    NoOp,
}

/// A shopping cart.
///
/// Lines are unique per product and kept in insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `qty` units of a catalog product.
    ///
    /// Quantities accumulate on an existing line; a new line snapshots the
    /// product's current name and unit price.
    ///
    /// # Errors
    ///
    /// - [`CartError::NotFound`] if the product is not in the catalog
    /// - [`CartError::InvalidQuantity`] if `qty < 1`
    /// - [`CartError::QuantityTooLarge`] on integer overflow
    pub fn add(
        &mut self,
        catalog: &Catalog,
        product_id: ProductId,
        qty: i64,
    ) -> Result<&LineItem, CartError> {
        let product = catalog
            .find(product_id)
            .ok_or(CartError::NotFound(product_id))?;
        if qty < 1 {
            return Err(CartError::InvalidQuantity(qty));
        }
        let too_large = CartError::QuantityTooLarge { product_id, qty };
        let qty = u32::try_from(qty).map_err(|_| too_large.clone())?;

        let idx = match self.position(product_id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                let new_qty = item.qty.checked_add(qty).ok_or(too_large)?;
                item.set_qty(new_qty)?;
                idx
            }
            None => {
                self.items.push(LineItem::new(product, qty)?);
                self.items.len() - 1
            }
        };
        Ok(&self.items[idx])
    }

    /// Set the quantity of a line.
    ///
    /// A quantity of zero or less removes the line. A positive quantity for a
    /// product that is not in the cart changes nothing and reports
    /// [`QuantityUpdate::NoOp`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityTooLarge`] on integer overflow.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        qty: i64,
    ) -> Result<QuantityUpdate, CartError> {
        let Some(idx) = self.position(product_id) else {
            return Ok(QuantityUpdate::NoOp);
        };

        if qty <= 0 {
            self.items.remove(idx);
            return Ok(QuantityUpdate::Removed);
        }

        let qty = u32::try_from(qty).map_err(|_| CartError::QuantityTooLarge { product_id, qty })?;
        match self.items.get_mut(idx) {
            Some(item) => {
                item.set_qty(qty)?;
                Ok(QuantityUpdate::Updated)
            }
            None => Ok(QuantityUpdate::NoOp),
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// A copy of the lines in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }
}
