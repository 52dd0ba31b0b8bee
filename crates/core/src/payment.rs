//! Payment method selection and settlement messages.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::pricing::PricingPolicy;
use crate::types::{Cents, FinancialStatus};

/// PIX key quoted in immediate settlement messages.
pub const PIX_KEY: &str = "mercado@exemplo.com";

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Pix,
    Credit,
}

impl PaymentMethod {
    /// Parse a client-supplied method name.
    ///
    /// Returns `None` for anything unrecognized; callers fall back to the
    /// value-based default instead of rejecting the request.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pix" => Some(Self::Pix),
            "credit" | "cartao" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The settlement behavior chosen for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStrategy {
    /// Paid in full right away (PIX).
    Immediate,
    /// Charged to a credit card over `installments` payments.
    Installment { installments: u8 },
}

impl PaymentStrategy {
    /// Pick the strategy for an order.
    ///
    /// A recognized explicit method wins. Without one, totals up to the
    /// free-shipping threshold settle immediately and larger ones go to the
    /// card in a single installment.
    #[must_use]
    pub fn resolve(method: Option<PaymentMethod>, total: Cents, policy: &PricingPolicy) -> Self {
        let method = method.unwrap_or(if total <= policy.free_shipping_threshold {
            PaymentMethod::Pix
        } else {
            PaymentMethod::Credit
        });
        Self::for_method(method, 1)
    }

    /// The strategy for a known method.
    #[must_use]
    pub const fn for_method(method: PaymentMethod, installments: u8) -> Self {
        match method {
            PaymentMethod::Pix => Self::Immediate,
            PaymentMethod::Credit => Self::Installment { installments },
        }
    }

    #[must_use]
    pub const fn method(self) -> PaymentMethod {
        match self {
            Self::Immediate => PaymentMethod::Pix,
            Self::Installment { .. } => PaymentMethod::Credit,
        }
    }

    /// Financial status an order settled this way is born with.
    #[must_use]
    pub const fn financial_status(self) -> FinancialStatus {
        match self {
            Self::Immediate => FinancialStatus::Paid,
            Self::Installment { .. } => FinancialStatus::Authorized,
        }
    }

    /// Settle `amount` and return the confirmation text.
    ///
    /// `amount` is the final figure the customer pays, interest included.
    #[must_use]
    pub fn process(self, amount: Cents) -> String {
        match self {
            Self::Immediate => format!(
                "Pagamento via PIX processado com sucesso! Total: {amount}. Chave PIX: {PIX_KEY}"
            ),
            Self::Installment { installments } => {
                let noun = if installments == 1 { "parcela" } else { "parcelas" };
                format!(
                    "Pagamento via Cartão de Crédito processado com sucesso! Total: {amount}. \
                     Transação aprovada em {installments} {noun}."
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_methods() {
        assert_eq!(PaymentMethod::parse("pix"), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::parse(" PIX "), Some(PaymentMethod::Pix));
        assert_eq!(PaymentMethod::parse("credit"), Some(PaymentMethod::Credit));
        assert_eq!(PaymentMethod::parse("cartao"), Some(PaymentMethod::Credit));
        assert_eq!(PaymentMethod::parse("boleto"), None);
        assert_eq!(PaymentMethod::parse(""), None);
    }

    #[test]
    fn test_explicit_method_wins() {
        let policy = PricingPolicy::default();
        assert_eq!(
            PaymentStrategy::resolve(Some(PaymentMethod::Credit), Cents::new(100), &policy),
            PaymentStrategy::Installment { installments: 1 }
        );
        assert_eq!(
            PaymentStrategy::resolve(Some(PaymentMethod::Pix), Cents::new(90_000), &policy),
            PaymentStrategy::Immediate
        );
    }

    #[test]
    fn test_fallback_by_total() {
        let policy = PricingPolicy::default();
        assert_eq!(
            PaymentStrategy::resolve(None, Cents::new(5000), &policy),
            PaymentStrategy::Immediate
        );
        assert_eq!(
            PaymentStrategy::resolve(None, Cents::new(5001), &policy).method(),
            PaymentMethod::Credit
        );
    }

    #[test]
    fn test_immediate_message() {
        let message = PaymentStrategy::Immediate.process(Cents::new(3550));
        assert_eq!(
            message,
            "Pagamento via PIX processado com sucesso! Total: R$ 35,50. \
             Chave PIX: mercado@exemplo.com"
        );
    }

    #[test]
    fn test_installment_message_uses_count() {
        let message = PaymentStrategy::Installment { installments: 4 }.process(Cents::new(6240));
        assert!(message.contains("Cartão de Crédito"));
        assert!(message.contains("Total: R$ 62,40"));
        assert!(message.ends_with("em 4 parcelas."));

        let single = PaymentStrategy::Installment { installments: 1 }.process(Cents::new(100));
        assert!(single.ends_with("em 1 parcela."));
    }

    #[test]
    fn test_financial_status() {
        assert_eq!(
            PaymentStrategy::Immediate.financial_status(),
            FinancialStatus::Paid
        );
        assert_eq!(
            PaymentStrategy::Installment { installments: 2 }.financial_status(),
            FinancialStatus::Authorized
        );
    }
}
