//! Integer currency amounts.
//!
//! Every monetary value in Mercado is an integer number of cents. The
//! currency is fixed to BRL by convention, so no currency code travels with
//! the amount. Decimal arithmetic (for interest) and display go through
//! [`rust_decimal`] so no float ever touches a price.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount of money in cents.
///
/// Serializes as a bare JSON integer.
///
/// ```
/// use mercado_core::Cents;
///
/// let price = Cents::new(850);
/// assert_eq!(price.checked_mul(3), Some(Cents::new(2550)));
/// assert_eq!(Cents::new(3550).to_string(), "R$ 35,50");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a number of cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// The raw number of cents.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Multiply by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, qty: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(qty)).map(Self)
    }

    /// Split into `parts` equal shares, rounding each share up.
    ///
    /// The shares always cover the whole amount: `share * parts >= self`.
    /// Returns `None` when `parts` is zero.
    #[must_use]
    pub fn div_ceil(self, parts: u8) -> Option<Self> {
        let parts = i64::from(parts);
        if parts == 0 {
            return None;
        }
        let quotient = self.0 / parts;
        if self.0 % parts > 0 {
            Some(Self(quotient + 1))
        } else {
            Some(Self(quotient))
        }
    }

    /// The amount in reais as an exact decimal (e.g. `35.50`).
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Cents {
    /// Formats as Brazilian reais, e.g. `R$ 35,50`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reais = self.to_decimal().to_string().replace('.', ",");
        write!(f, "R$ {reais}")
    }
}

impl From<i64> for Cents {
    fn from(cents: i64) -> Self {
        Self(cents)
    }
}

impl From<Cents> for i64 {
    fn from(cents: Cents) -> Self {
        cents.0
    }
}

impl Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Cents {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_brl() {
        assert_eq!(Cents::new(3550).to_string(), "R$ 35,50");
        assert_eq!(Cents::new(6240).to_string(), "R$ 62,40");
        assert_eq!(Cents::new(5).to_string(), "R$ 0,05");
        assert_eq!(Cents::ZERO.to_string(), "R$ 0,00");
    }

    #[test]
    fn test_checked_mul_overflow() {
        assert_eq!(Cents::new(i64::MAX).checked_mul(2), None);
        assert_eq!(Cents::new(850).checked_mul(0), Some(Cents::ZERO));
    }

    #[test]
    fn test_div_ceil_covers_amount() {
        assert_eq!(Cents::new(10200).div_ceil(3), Some(Cents::new(3400)));
        assert_eq!(Cents::new(6240).div_ceil(4), Some(Cents::new(1560)));
        assert_eq!(Cents::new(1001).div_ceil(2), Some(Cents::new(501)));
        assert_eq!(Cents::new(100).div_ceil(0), None);
    }

    #[test]
    fn test_sum() {
        let total: Cents = [Cents::new(100), Cents::new(250)].iter().sum();
        assert_eq!(total, Cents::new(350));
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Cents::new(2550)).unwrap(), "2550");
    }
}
