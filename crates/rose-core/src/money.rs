//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Whole Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The shop prices everything in whole pesos:                             │
//! │                                                                         │
//! │    Malteada   $9.000                                                    │
//! │    Fresas     $1.000                                                    │
//! │    Helado       $800                                                    │
//! │                                                                         │
//! │  There is no minor unit in use, so the stored integer IS the amount.    │
//! │  Display groups thousands with "." the way es-CO formats them.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rose_core::money::Money;
//!
//! let price = Money::from_units(5000);
//! let total = price + Money::from_units(800);
//! assert_eq!(total.to_string(), "$5.800");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Where Money is Used
/// ```text
/// Product.price ──┬──► CheckoutQuote.total ──► Sale.total
///                 │
/// Topping.price ──┴──► SaleToppingLine.price_at_sale
///
/// DailySummary.total ──► "*💰 Total Recaudado:* $45.600"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Zero money.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Formats the absolute amount with "." thousands separators (no symbol).
    ///
    /// ```rust
    /// use rose_core::money::Money;
    /// assert_eq!(Money::from_units(1234567).grouped(), "1.234.567");
    /// assert_eq!(Money::from_units(800).grouped(), "800");
    /// ```
    pub fn grouped(&self) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// `$5.800`, `-$1.000`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}", sign, self.grouped())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_units(0).to_string(), "$0");
        assert_eq!(Money::from_units(999).to_string(), "$999");
        assert_eq!(Money::from_units(1000).to_string(), "$1.000");
        assert_eq!(Money::from_units(45600).to_string(), "$45.600");
        assert_eq!(Money::from_units(1_250_000).to_string(), "$1.250.000");
        assert_eq!(Money::from_units(-1000).to_string(), "-$1.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(5000);
        let b = Money::from_units(1800);
        assert_eq!((a + b).units(), 6800);
        assert_eq!((a - b).units(), 3200);

        let mut c = a;
        c += b;
        c -= Money::from_units(1000);
        assert_eq!(c.units(), 5800);
    }

    #[test]
    fn test_sum() {
        let prices = [Money::from_units(1000), Money::from_units(800), Money::from_units(500)];
        let owned: Money = prices.iter().copied().sum();
        let borrowed: Money = prices.iter().sum();
        assert_eq!(owned, Money::from_units(2300));
        assert_eq!(owned, borrowed);
        assert_eq!(std::iter::empty::<Money>().sum::<Money>(), Money::zero());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_units(5800)).unwrap();
        assert_eq!(json, "5800");
    }
}
