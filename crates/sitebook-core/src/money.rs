//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE SUMMATION DRIFT PROBLEM                                            │
//! │                                                                         │
//! │  Summing a month of expenses as floats:                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    ...repeated over thousands of rows, the card total drifts.           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    10 + 20 = 30 cents, exactly, no matter how many rows                 │
//! │    Floats appear only in the final percentage division                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Money` carries no currency. Amounts in different currencies are never
//! added together: the aggregator keeps one running total per currency.
//!
//! ## Usage
//! ```rust
//! use sitebook_core::money::Money;
//!
//! let cement = Money::from_cents(125_050); // 1250.50
//! let rebar = Money::from_major_minor(300, 0);
//! assert_eq!((cement + rebar).cents(), 155_050);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD/EUR).
///
/// ## Design Decisions
/// - **i64 (signed)**: imported historical rows may carry zero or negative
///   amounts (refunds, corrections); they must still be representable
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use sitebook_core::money::Money;
    ///
    /// let wage = Money::from_cents(250_000); // 2500.00
    /// assert_eq!(wage.cents(), 250_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `part / whole * 100` without rounding.
    ///
    /// ## Zero Guard
    /// A zero `whole` yields `0.0`, never NaN or infinity.
    ///
    /// ## Example
    /// ```rust
    /// use sitebook_core::money::Money;
    ///
    /// let pct = Money::percent_of(Money::from_cents(10), Money::from_cents(30));
    /// assert!((pct - 33.333_333).abs() < 1e-4);
    /// assert_eq!(Money::percent_of(Money::from_cents(5), Money::zero()), 0.0);
    /// ```
    pub fn percent_of(part: Money, whole: Money) -> f64 {
        if whole.is_zero() {
            return 0.0;
        }
        part.0 as f64 / whole.0 as f64 * 100.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount as `major.minor` with no currency symbol; the caller
/// appends the currency code.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds: stored rows are not limited by
// input validation.

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
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
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
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c += b;
        c -= Money::from_cents(1);
        assert_eq!(c.cents(), 1499);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max + Money::from_cents(1), max);
        assert_eq!(min - Money::from_cents(1), min);

        let mut total = max;
        total += max;
        assert_eq!(total, max);
        assert_eq!(total.to_string(), "92233720368547758.07");
    }

    #[test]
    fn test_sum_has_no_drift() {
        let dimes = vec![Money::from_cents(10); 1_000];
        let total: Money = dimes.iter().sum();
        assert_eq!(total.cents(), 10_000);
    }

    #[test]
    fn test_percent_of_guards_zero() {
        assert_eq!(Money::percent_of(Money::from_cents(100), Money::zero()), 0.0);
        assert_eq!(
            Money::percent_of(Money::from_cents(50), Money::from_cents(200)),
            25.0
        );
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::zero().is_positive());
    }
}
