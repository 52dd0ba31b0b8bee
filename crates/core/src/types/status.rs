//! Status enums for orders.

use serde::{Deserialize, Serialize};

/// Financial status of a finalized order.
///
/// Settlement happens synchronously at checkout, so an order is born in its
/// final financial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    /// Card transaction approved; collected over the installment schedule.
    Authorized,
    /// Collected in full.
    Paid,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Confirmed,
}
