//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Centavos?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends reais as JSON numbers:                               │
//! │    { "total": 0.1 } + { "total": 0.2 } = 0.30000000000000004  ❌        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    Decode once at the boundary (0.1 → 10 centavos), add integers,       │
//! │    encode back to reais only when the value leaves the process.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ingredient unit costs are NOT money: a gram of vanilla can cost a
//! fraction of a centavo. Those stay `f64` (see [`crate::costing`]).
//!
//! ## Usage
//! ```rust
//! use sapore_core::money::Money;
//!
//! let price = Money::from_centavos(1250); // R$ 12,50
//! let line = price.multiply_quantity(3);  // R$ 37,50
//! assert_eq!(line.to_string(), "R$ 37,50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::error::ValidationError;
use crate::types::Percentage;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (1/100 of a real).
///
/// ## Wire Format
/// The backend speaks reais as JSON numbers, so `Money` serializes to and
/// from `f64` reais. Conversion rounds to the nearest centavo.
///
/// ```text
///   JSON  12.5  ──decode──►  Money(1250)  ──encode──►  12.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ```rust
    /// use sapore_core::money::Money;
    ///
    /// let price = Money::from_centavos(1099);
    /// assert_eq!(price.centavos(), 1099);
    /// ```
    #[inline]
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Creates a Money value from a decimal amount of reais, rounding to the
    /// nearest centavo (half away from zero).
    ///
    /// ```rust
    /// use sapore_core::money::Money;
    ///
    /// assert_eq!(Money::from_reais(2.25).centavos(), 225);
    /// assert_eq!(Money::from_reais(0.125).centavos(), 13);
    /// ```
    pub fn from_reais(reais: f64) -> Self {
        Money((reais * 100.0).round() as i64)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Returns the value as decimal reais (for the wire and for charts only).
    #[inline]
    pub fn reais(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the whole-reais portion.
    #[inline]
    pub const fn whole_reais(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Brigadeiro gourmet R$ 3,50
    /// Quantity: 100
    ///      │
    ///      ▼
    /// multiply_quantity(100) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line subtotal: R$ 350,00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns `pct` of this amount, rounded half up to the centavo.
    ///
    /// ```rust
    /// use sapore_core::money::Money;
    /// use sapore_core::types::Percentage;
    ///
    /// let revenue = Money::from_centavos(10000);
    /// let tax = revenue.percentage_of(Percentage::from_bps(600)); // 6%
    /// assert_eq!(tax.centavos(), 600);
    /// ```
    pub fn percentage_of(&self, pct: Percentage) -> Money {
        // i128 so large totals times basis points cannot overflow
        let cents = (self.0 as i128 * pct.bps() as i128 + 5000) / 10000;
        Money::from_centavos(cents as i64)
    }
}

// =============================================================================
// Wire Conversions
// =============================================================================

impl TryFrom<f64> for Money {
    type Error = ValidationError;

    fn try_from(reais: f64) -> Result<Self, Self::Error> {
        if !reais.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("{} is not a finite number", reais),
            });
        }
        Ok(Money::from_reais(reais))
    }
}

impl From<Money> for f64 {
    fn from(money: Money) -> f64 {
        money.reais()
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian formatting: `R$ 1.234,56`.
///
/// The web console formats on its own; this is for the command line and logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let whole = self.whole_reais().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, self.centavos_part())
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
    fn test_from_centavos() {
        let money = Money::from_centavos(1099);
        assert_eq!(money.centavos(), 1099);
        assert_eq!(money.whole_reais(), 10);
        assert_eq!(money.centavos_part(), 99);
    }

    #[test]
    fn test_from_reais_rounds_to_centavo() {
        assert_eq!(Money::from_reais(10.99).centavos(), 1099);
        assert_eq!(Money::from_reais(0.1 + 0.2).centavos(), 30);
        assert_eq!(Money::from_reais(-5.5).centavos(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_centavos(1099).to_string(), "R$ 10,99");
        assert_eq!(Money::from_centavos(500).to_string(), "R$ 5,00");
        assert_eq!(Money::from_centavos(-550).to_string(), "-R$ 5,50");
        assert_eq!(Money::from_centavos(0).to_string(), "R$ 0,00");
        assert_eq!(Money::from_centavos(123456).to_string(), "R$ 1.234,56");
        assert_eq!(Money::from_centavos(100000000).to_string(), "R$ 1.000.000,00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_centavos(1000);
        let b = Money::from_centavos(500);

        assert_eq!((a + b).centavos(), 1500);
        assert_eq!((a - b).centavos(), 500);
        assert_eq!((a * 3).centavos(), 3000);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.centavos(), 2000);
    }

    #[test]
    fn test_percentage_of() {
        let amount = Money::from_centavos(1000);
        assert_eq!(amount.percentage_of(Percentage::from_bps(1000)).centavos(), 100);
        // R$ 10,00 at 8.25% = 82.5 centavos → 83
        assert_eq!(amount.percentage_of(Percentage::from_bps(825)).centavos(), 83);
    }

    #[test]
    fn test_wire_format_is_reais() {
        let json = serde_json::to_string(&Money::from_centavos(1250)).unwrap();
        assert_eq!(json, "12.5");

        let back: Money = serde_json::from_str("37.9").unwrap();
        assert_eq!(back.centavos(), 3790);

        let int: Money = serde_json::from_str("15").unwrap();
        assert_eq!(int.centavos(), 1500);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_centavos(1).is_positive());
        assert!(Money::from_centavos(-1).is_negative());
        assert_eq!(Money::from_centavos(-550).abs().centavos(), 550);
    }
}
