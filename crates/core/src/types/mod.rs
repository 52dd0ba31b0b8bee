//! Core value types for Mercado.
//!
//! This module provides type-safe wrappers for IDs, money, emails and statuses.

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId};
pub use money::Cents;
pub use status::{FinancialStatus, OrderStatus};
