//! # Money Module
//!
//! The `Money` type used for every price and total in the cart.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The storefront prices caps like 24.99 and shows a running subtotal.   │
//! │  With floats: 0.1 + 0.2 = 0.30000000000000004                          │
//! │                                                                         │
//! │  Stored as cents, a subtotal is an exact integer sum:                  │
//! │    2499 × 3 + 1999 = 9496 cents → "$94.96"                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use capshop_core::money::Money;
//!
//! let price = Money::from_cents(2499);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 7497);
//! assert_eq!(line.to_string(), "$74.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in minor units (cents).
///
/// Signed so that intermediate differences can be expressed, although cart
/// prices themselves are validated to be non-negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a value from whole dollars and cents.
    ///
    /// ```rust
    /// use capshop_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(24, 99).cents(), 2499);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero.
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

    /// Price × quantity for a single line. Saturates instead of overflowing.
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Tax owed on this amount, rounded half-up to the nearest cent.
    ///
    /// ```rust
    /// use capshop_core::money::Money;
    /// use capshop_core::types::TaxRate;
    ///
    /// // $24.99 at 8% = $1.9992 → $2.00
    /// let tax = Money::from_cents(2499).calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(tax.cents(), 200);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large carts from overflowing before the division.
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly dollar rendering. Localized display belongs to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
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
    fn test_display() {
        assert_eq!(Money::from_cents(2499).to_string(), "$24.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_major_minor() {
        assert_eq!(Money::from_major_minor(29, 99).cents(), 2999);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_sum_of_lines() {
        let lines = [
            Money::from_cents(2499) * 3,
            Money::from_cents(1999) * 1,
        ];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 9496);
    }

    #[test]
    fn test_eight_percent_tax() {
        // $10.00 at 8% = $0.80 exactly
        let tax = Money::from_cents(1000).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 80);

        // $0.06 at 8% = 0.48 cents → rounds to 0
        let tax = Money::from_cents(6).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 0);

        // $0.07 at 8% = 0.56 cents → rounds to 1
        let tax = Money::from_cents(7).calculate_tax(TaxRate::from_bps(800));
        assert_eq!(tax.cents(), 1);
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let huge = Money::from_cents(10_000_000_000);
        assert_eq!(huge.multiply_quantity(u32::MAX).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MAX) + Money::from_cents(1)).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);

        let tax = Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(20_000));
        assert_eq!(tax.cents(), i64::MAX);
    }

    #[test]
    fn test_zero_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_cents(-1).is_negative());
    }
}
