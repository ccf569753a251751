//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend hands us prices as JSON numbers:                           │
//! │    12.90 + 2.10 + 2.10 = 17.099999999999998                             │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Numbers are rounded to cents ONCE, at ingestion                      │
//! │    1290 + 210 + 210 = 1710                                              │
//! │    Every later sum, product and discount is exact                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(1290); // R$ 12,90
//! let doubled = price * 2;
//! let total = price + Money::from_cents(210);
//!
//! assert_eq!(doubled.cents(), 2580);
//! assert_eq!(total.cents(), 1500);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──┐                                                      │
/// │                  ├──► compute_unit_price ──► CartItem.unit_price        │
/// │  Option.price ───┘                                 │                    │
/// │                                                    ▼                    │
/// │                               line_total ──► subtotal ──► discount      │
/// │                                                    │                    │
/// │                                                    ▼                    │
/// │                          max(0, subtotal - discount) + delivery fee     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount coming from the backend into cents,
    /// rounding half away from zero.
    ///
    /// The float is read through its shortest decimal text (`1.005`, not
    /// 1.00499999...), so ties round the way they were written.
    ///
    /// Only the ingestion boundary calls this. Non-finite or out-of-range
    /// input yields zero.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(12.9).cents(), 1290);
    /// assert_eq!(Money::from_decimal(49.99).cents(), 4999);
    /// assert_eq!(Money::from_decimal(1.005).cents(), 101);
    /// assert_eq!(Money::from_decimal(f64::NAN).cents(), 0);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        amount
            .to_string()
            .parse::<Decimal>()
            .ok()
            .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|d| d.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|d| d.to_i64())
            .map(Money)
            .unwrap_or_default()
    }

    /// Returns the value in cents.
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

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Floors the value at zero.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-1000).clamp_non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(250).clamp_non_negative().cents(), 250);
    /// ```
    #[inline]
    pub const fn clamp_non_negative(self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1710);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 5130);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `rate` of this amount, rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_cents(10000);          // 100,00
    /// let rate = DiscountRate::from_bps(1000);          // 10%
    /// assert_eq!(subtotal.portion(rate).cents(), 1000); // 10,00
    ///
    /// // 33,35 at 15% = 5,0025 → 5,00
    /// let odd = Money::from_cents(3335);
    /// assert_eq!(odd.portion(DiscountRate::from_bps(1500)).cents(), 500);
    /// ```
    pub fn portion(&self, rate: DiscountRate) -> Money {
        // i128 so large subtotals cannot overflow the intermediate product
        let cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering. Customer-facing text goes through the app's
/// currency formatter, which knows the symbol and decimal separator.
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
    fn test_from_decimal_rounds_float_noise() {
        // 0.1 + 0.2 style noise must not leak into cents
        assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_decimal(7.0).cents(), 700);
        // Ties are decided on the written decimal, not the binary float
        assert_eq!(Money::from_decimal(2.005).cents(), 201);
        assert_eq!(Money::from_decimal(1.005).cents(), 101);
        assert_eq!(Money::from_decimal(-2.005).cents(), -201);
        assert_eq!(Money::from_decimal(f64::INFINITY).cents(), 0);
        assert_eq!(Money::from_decimal(1e27).cents(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((b * 2).cents(), 1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 5].iter().map(|c| Money::from_cents(*c)).sum();
        assert_eq!(total.cents(), 355);
    }

    #[test]
    fn test_portion_rounding() {
        let amount = Money::from_cents(1000);
        // 10,00 at 8.25% = 0,825 → 0,83
        assert_eq!(amount.portion(DiscountRate::from_bps(825)).cents(), 83);
        assert_eq!(amount.portion(DiscountRate::zero()).cents(), 0);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert!(Money::from_cents(-1).clamp_non_negative().is_zero());
        assert!(Money::from_cents(1).clamp_non_negative().is_positive());
    }
}
