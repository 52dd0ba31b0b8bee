//! Pricing policy: shipping, totals and installment quotes.
//!
//! A single [`PricingPolicy`] value backs every figure the store shows: the
//! cart summary, the installment preview and the authoritative checkout
//! amounts. Nothing here is cached; totals are recomputed on each call.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::LineItem;
use crate::types::Cents;

/// Hard upper bound on the installment count a policy may allow.
pub const INSTALLMENT_LIMIT: u8 = 12;

/// Errors raised by pricing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// Installment count outside `1..=max_installments`.
    #[error("installments must be between 1 and {max} (got {requested})")]
    InvalidInstallments { requested: i64, max: u8 },

    /// An amount does not fit the integer range after interest.
    #[error("amount {0} is too large to quote")]
    Overflow(Cents),

    /// The policy itself is inconsistent.
    #[error("invalid pricing policy: {0}")]
    InvalidPolicy(&'static str),
}

/// Subtotal, shipping and grand total of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal_cents: Cents,
    pub shipping_cents: Cents,
    pub total_cents: Cents,
}

/// What paying a total over a number of installments costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentQuote {
    pub installments: u8,
    pub per_installment_cents: Cents,
    pub total_with_interest_cents: Cents,
    pub interest_cents: Cents,
}

/// Store-wide pricing constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Shipping is waived when the subtotal is strictly above this.
    pub free_shipping_threshold: Cents,
    pub flat_shipping_fee: Cents,
    /// Installment counts up to this carry no interest.
    pub interest_free_installments: u8,
    /// Simple monthly interest in basis points (200 = 2%).
    pub monthly_interest_bps: u32,
    pub max_installments: u8,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            free_shipping_threshold: Cents::new(5000),
            flat_shipping_fee: Cents::new(1000),
            interest_free_installments: 2,
            monthly_interest_bps: 200,
            max_installments: INSTALLMENT_LIMIT,
        }
    }
}

impl PricingPolicy {
    /// Check the policy for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidPolicy`] naming the offending field.
    pub const fn validate(&self) -> Result<(), PricingError> {
        if self.max_installments == 0 || self.max_installments > INSTALLMENT_LIMIT {
            return Err(PricingError::InvalidPolicy(
                "max_installments must be between 1 and 12",
            ));
        }
        if self.free_shipping_threshold.as_i64() < 0 {
            return Err(PricingError::InvalidPolicy(
                "free_shipping_threshold must not be negative",
            ));
        }
        if self.flat_shipping_fee.as_i64() < 0 {
            return Err(PricingError::InvalidPolicy(
                "flat_shipping_fee must not be negative",
            ));
        }
        Ok(())
    }

    /// Shipping fee for a subtotal.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Cents) -> Cents {
        if subtotal > self.free_shipping_threshold {
            Cents::ZERO
        } else {
            self.flat_shipping_fee
        }
    }

    /// Totals for a cart snapshot.
    #[must_use]
    pub fn totals_for(&self, items: &[LineItem]) -> CartTotals {
        let subtotal_cents: Cents = items.iter().map(|item| item.line_total_cents).sum();
        let shipping_cents = self.shipping_for(subtotal_cents);
        CartTotals {
            subtotal_cents,
            shipping_cents,
            total_cents: subtotal_cents + shipping_cents,
        }
    }

    /// Validate a requested installment count against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::InvalidInstallments`] if `requested` is outside
    /// `1..=max_installments`.
    pub fn installment_count(&self, requested: i64) -> Result<u8, PricingError> {
        u8::try_from(requested)
            .ok()
            .filter(|n| (1..=self.max_installments).contains(n))
            .ok_or(PricingError::InvalidInstallments {
                requested,
                max: self.max_installments,
            })
    }

    /// Quote paying `total` over `installments` payments.
    ///
    /// Counts up to `interest_free_installments` carry no interest. Beyond
    /// that, each extra month adds `monthly_interest_bps` of simple interest
    /// on the whole total, rounded half-up to the cent. The per-installment
    /// amount is rounded up so the installments always cover the total.
    ///
    /// # Errors
    ///
    /// - [`PricingError::InvalidInstallments`] if the count is out of range
    /// - [`PricingError::Overflow`] if the total with interest does not fit
    pub fn quote_installments(
        &self,
        total: Cents,
        installments: u32,
    ) -> Result<InstallmentQuote, PricingError> {
        let n = self.installment_count(i64::from(installments))?;
        let months = n.saturating_sub(self.interest_free_installments);

        let total_with_interest_cents = if months == 0 {
            total
        } else {
            self.apply_interest(total, months)?
        };

        let per_installment_cents = total_with_interest_cents
            .div_ceil(n)
            .ok_or(PricingError::InvalidInstallments {
                requested: i64::from(n),
                max: self.max_installments,
            })?;

        Ok(InstallmentQuote {
            installments: n,
            per_installment_cents,
            total_with_interest_cents,
            interest_cents: total_with_interest_cents - total,
        })
    }

    /// Quotes for every allowed installment count, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if any quote overflows.
    pub fn installment_options(&self, total: Cents) -> Result<Vec<InstallmentQuote>, PricingError> {
        (1..=u32::from(self.max_installments))
            .map(|n| self.quote_installments(total, n))
            .collect()
    }

    fn apply_interest(&self, total: Cents, months: u8) -> Result<Cents, PricingError> {
        let rate = i64::from(self.monthly_interest_bps) * i64::from(months);
        let factor = Decimal::ONE + Decimal::new(rate, 4);

        Decimal::from(total.as_i64())
            .checked_mul(factor)
            .map(|amount| amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|amount| amount.to_i64())
            .map(Cents::new)
            .ok_or(PricingError::Overflow(total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::Cart;
    use crate::catalog::{Catalog, Product};
    use crate::types::ProductId;

    #[test]
    fn test_shipping_threshold_is_strict() {
        let policy = PricingPolicy::default();
        assert_eq!(policy.shipping_for(Cents::new(5000)), Cents::new(1000));
        assert_eq!(policy.shipping_for(Cents::new(5001)), Cents::ZERO);
        assert_eq!(policy.shipping_for(Cents::ZERO), Cents::new(1000));
    }

    #[test]
    fn test_totals_for_cart() {
        let policy = PricingPolicy::default();
        let catalog = Catalog::seeded();
        let mut cart = Cart::new();
        cart.add(&catalog, ProductId::new(1), 3).unwrap();

        let totals = policy.totals_for(&cart.snapshot());
        assert_eq!(totals.subtotal_cents, Cents::new(2550));
        assert_eq!(totals.shipping_cents, Cents::new(1000));
        assert_eq!(totals.total_cents, Cents::new(3550));
    }

    #[test]
    fn test_totals_for_waives_shipping() {
        let policy = PricingPolicy::default();
        let catalog = Catalog::new(vec![Product::new(1, "Cesta", 6000, 1, "cesta.png")]);
        let mut cart = Cart::new();
        cart.add(&catalog, ProductId::new(1), 1).unwrap();

        let totals = policy.totals_for(&cart.snapshot());
        assert_eq!(totals.shipping_cents, Cents::ZERO);
        assert_eq!(totals.total_cents, Cents::new(6000));
    }

    #[test]
    fn test_totals_for_empty() {
        let totals = PricingPolicy::default().totals_for(&[]);
        assert_eq!(totals.subtotal_cents, Cents::ZERO);
        assert_eq!(totals.total_cents, Cents::new(1000));
    }

    #[test]
    fn test_interest_free_installments() {
        let policy = PricingPolicy::default();
        for n in [1, 2] {
            let quote = policy.quote_installments(Cents::new(10000), n).unwrap();
            assert_eq!(quote.interest_cents, Cents::ZERO);
            assert_eq!(quote.total_with_interest_cents, Cents::new(10000));
        }
        let two = policy.quote_installments(Cents::new(10001), 2).unwrap();
        assert_eq!(two.per_installment_cents, Cents::new(5001));
    }

    #[test]
    fn test_three_installments() {
        let quote = PricingPolicy::default()
            .quote_installments(Cents::new(10000), 3)
            .unwrap();
        assert_eq!(quote.total_with_interest_cents, Cents::new(10200));
        assert_eq!(quote.per_installment_cents, Cents::new(3400));
        assert_eq!(quote.interest_cents, Cents::new(200));
    }

    #[test]
    fn test_four_installments() {
        let quote = PricingPolicy::default()
            .quote_installments(Cents::new(6000), 4)
            .unwrap();
        assert_eq!(quote.total_with_interest_cents, Cents::new(6240));
        assert_eq!(quote.per_installment_cents, Cents::new(1560));
    }

    #[test]
    fn test_interest_rounds_half_up() {
        // 1025 * 1.02 = 1045.5
        let quote = PricingPolicy::default()
            .quote_installments(Cents::new(1025), 3)
            .unwrap();
        assert_eq!(quote.total_with_interest_cents, Cents::new(1046));
    }

    #[test]
    fn test_installments_cover_total() {
        let policy = PricingPolicy::default();
        for total in [1, 999, 3550, 6001, 12345, 99_999] {
            for quote in policy.installment_options(Cents::new(total)).unwrap() {
                let covered = quote
                    .per_installment_cents
                    .checked_mul(u32::from(quote.installments))
                    .unwrap();
                assert!(covered >= quote.total_with_interest_cents);
            }
        }
    }

    #[test]
    fn test_out_of_range_installments() {
        let policy = PricingPolicy::default();
        assert_eq!(
            policy.quote_installments(Cents::new(100), 0).unwrap_err(),
            PricingError::InvalidInstallments {
                requested: 0,
                max: 12
            }
        );
        assert!(policy.quote_installments(Cents::new(100), 13).is_err());
        assert!(policy.installment_count(-1).is_err());
        assert_eq!(policy.installment_count(12).unwrap(), 12);
    }

    #[test]
    fn test_installment_options_table() {
        let options = PricingPolicy::default()
            .installment_options(Cents::new(10000))
            .unwrap();
        assert_eq!(options.len(), 12);
        assert_eq!(options[0].installments, 1);
        assert_eq!(options[11].installments, 12);
        // 10 months at 2%
        assert_eq!(options[11].total_with_interest_cents, Cents::new(12000));
        assert_eq!(options[11].per_installment_cents, Cents::new(1000));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = PricingPolicy::default()
            .quote_installments(Cents::new(i64::MAX), 12)
            .unwrap_err();
        assert_eq!(err, PricingError::Overflow(Cents::new(i64::MAX)));
    }

    #[test]
    fn test_validate_policy() {
        assert!(PricingPolicy::default().validate().is_ok());

        let policy = PricingPolicy {
            max_installments: 13,
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = PricingPolicy {
            flat_shipping_fee: Cents::new(-1),
            ..PricingPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}
