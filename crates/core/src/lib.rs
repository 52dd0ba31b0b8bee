//! Mercado Core - cart and checkout engine.
//!
//! This crate holds the storefront's domain logic, shared by:
//! - `storefront` - HTTP/JSON server
//! - `cli` - Operator tools for catalog listings and price quotes
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP, no
//! global state. Callers own carts and decide how they are scoped and locked.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, money, emails, and statuses
//! - [`catalog`] - The fixed product catalog
//! - [`cart`] - Cart ledger and line items
//! - [`pricing`] - Shipping, totals and installment quotes
//! - [`payment`] - Payment method selection and settlement messages
//! - [`checkout`] - Checkout orchestration into a finalized order

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod payment;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartError, LineItem, QuantityUpdate};
pub use catalog::{Catalog, Product};
pub use checkout::{
    CheckoutError, CheckoutRequest, CheckoutStage, Customer, Orchestrator, Order, PaymentSelection,
};
pub use payment::{PaymentMethod, PaymentStrategy};
pub use pricing::{CartTotals, InstallmentQuote, PricingError, PricingPolicy};
pub use types::*;
