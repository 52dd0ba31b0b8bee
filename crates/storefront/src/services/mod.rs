//! Business logic services for storefront.
//!
//! # Services
//!
//! - `carts` - Session-scoped, in-memory cart storage with per-cart locking

pub mod carts;

pub use carts::{CartBook, CartKey, CartSummary};
