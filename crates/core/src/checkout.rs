//! Checkout orchestration: cart snapshot to finalized order.
//!
//! An [`Orchestrator`] drives one checkout attempt through
//! `Idle → Validating → Settling → Finalized`, or into `Rejected` when any
//! step fails. The cart is cleared only as the last step of a successful run;
//! a rejected run leaves it exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Cart, LineItem};
use crate::payment::{PaymentMethod, PaymentStrategy};
use crate::pricing::{PricingError, PricingPolicy};
use crate::types::{Cents, Email, EmailError, FinancialStatus, OrderId, OrderStatus};

/// Confirmation shown with every order.
pub const ORDER_CONFIRMATION: &str = "Pedido realizado com sucesso!";

/// Where an orchestrator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStage {
    Idle,
    Validating,
    Settling,
    Finalized,
    Rejected,
}

/// Errors that reject a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("invalid customer email: {0}")]
    InvalidEmail(#[source] EmailError),

    #[error("installments must be between 1 and {max} (got {requested})")]
    InvalidInstallments { requested: i64, max: u8 },

    #[error(transparent)]
    Pricing(PricingError),

    /// The orchestrator already ran.
    #[error("checkout already ran (stage: {0:?})")]
    AlreadyRun(CheckoutStage),
}

impl CheckoutError {
    /// The request field a validation error points at, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidEmail(_) => Some("customer_email"),
            Self::InvalidInstallments { .. } => Some("payment.installments"),
            _ => None,
        }
    }
}

impl From<PricingError> for CheckoutError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidInstallments { requested, max } => {
                Self::InvalidInstallments { requested, max }
            }
            other => Self::Pricing(other),
        }
    }
}

/// Nested payment selection in a checkout request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelection {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub installments: Option<i64>,
}

/// Checkout form as submitted by the client.
///
/// Every field is optional on the wire; the orchestrator decides what is
/// required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    /// Flat method field; `payment.method` takes precedence.
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment: Option<PaymentSelection>,
}

impl CheckoutRequest {
    /// The first recognized method among `payment.method` and
    /// `payment_method`.
    #[must_use]
    pub fn requested_method(&self) -> Option<PaymentMethod> {
        self.payment
            .as_ref()
            .and_then(|p| p.method.as_deref())
            .and_then(PaymentMethod::parse)
            .or_else(|| self.payment_method.as_deref().and_then(PaymentMethod::parse))
    }

    #[must_use]
    pub fn requested_installments(&self) -> Option<i64> {
        self.payment.as_ref().and_then(|p| p.installments)
    }
}

/// Customer details captured on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_name: Option<String>,
    pub customer_email: Email,
    pub shipping_address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// A finalized order.
///
/// `total_cents` is the pre-interest total; card orders add the interest
/// figures alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub financial_status: FinancialStatus,
    pub created_at: DateTime<Utc>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub subtotal_cents: Cents,
    pub shipping_cents: Cents,
    pub total_cents: Cents,
    pub payment_method: PaymentMethod,
    pub payment_message: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_cents: Option<Cents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_with_interest_cents: Option<Cents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_value_cents: Option<Cents>,
}

impl Order {
    /// What the customer actually pays, interest included.
    #[must_use]
    pub fn amount_charged(&self) -> Cents {
        self.total_with_interest_cents.unwrap_or(self.total_cents)
    }
}

/// Runs a single checkout against a cart.
#[derive(Debug)]
pub struct Orchestrator<'a> {
    policy: &'a PricingPolicy,
    stage: CheckoutStage,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub const fn new(policy: &'a PricingPolicy) -> Self {
        Self {
            policy,
            stage: CheckoutStage::Idle,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    /// Check out `cart` and clear it on success.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadyRun`] if this orchestrator is not idle
    /// - [`CheckoutError::EmptyCart`] if the cart has no lines
    /// - [`CheckoutError::InvalidEmail`] if the email is missing or malformed
    /// - [`CheckoutError::InvalidInstallments`] for a card payment with an
    ///   out-of-range installment count
    /// - [`CheckoutError::Pricing`] if a total overflows
    pub fn run(&mut self, cart: &mut Cart, request: &CheckoutRequest) -> Result<Order, CheckoutError> {
        if self.stage != CheckoutStage::Idle {
            return Err(CheckoutError::AlreadyRun(self.stage));
        }

        match self.execute(cart, request) {
            Ok(order) => {
                cart.clear();
                self.stage = CheckoutStage::Finalized;
                Ok(order)
            }
            Err(err) => {
                self.stage = CheckoutStage::Rejected;
                Err(err)
            }
        }
    }

    fn execute(&mut self, cart: &Cart, request: &CheckoutRequest) -> Result<Order, CheckoutError> {
        self.stage = CheckoutStage::Validating;

        let items = cart.snapshot();
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let customer_email = Email::parse(request.customer_email.as_deref().unwrap_or_default())
            .map_err(CheckoutError::InvalidEmail)?;

        let totals = self.policy.totals_for(&items);
        let strategy = match PaymentStrategy::resolve(
            request.requested_method(),
            totals.total_cents,
            self.policy,
        ) {
            PaymentStrategy::Immediate => PaymentStrategy::Immediate,
            PaymentStrategy::Installment { .. } => {
                let requested = request.requested_installments().unwrap_or(1);
                PaymentStrategy::Installment {
                    installments: self.policy.installment_count(requested)?,
                }
            }
        };

        self.stage = CheckoutStage::Settling;

        let quote = match strategy {
            PaymentStrategy::Immediate => None,
            PaymentStrategy::Installment { installments } => Some(
                self.policy
                    .quote_installments(totals.total_cents, u32::from(installments))?,
            ),
        };
        let amount = quote.map_or(totals.total_cents, |q| q.total_with_interest_cents);
        let payment_message = strategy.process(amount);

        Ok(Order {
            order_id: OrderId::generate(),
            status: OrderStatus::Confirmed,
            financial_status: strategy.financial_status(),
            created_at: Utc::now(),
            customer: Customer {
                customer_name: request.customer_name.clone(),
                customer_email,
                shipping_address: request.shipping_address.clone(),
                city: request.city.clone(),
                zip_code: request.zip_code.clone(),
            },
            items,
            subtotal_cents: totals.subtotal_cents,
            shipping_cents: totals.shipping_cents,
            total_cents: totals.total_cents,
            payment_method: strategy.method(),
            payment_message,
            message: ORDER_CONFIRMATION.to_owned(),
            installments: quote.map(|q| q.installments),
            interest_cents: quote.map(|q| q.interest_cents),
            total_with_interest_cents: quote.map(|q| q.total_with_interest_cents),
            installment_value_cents: quote.map(|q| q.per_installment_cents),
        })
    }
}
