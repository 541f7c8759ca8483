//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `Currency` description used to round incoming prices and format totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The product API returns prices as JSON numbers:                        │
//! │    149999.6 (float) → displayed as $149.999,6 ❌                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units, rounded ONCE at the boundary        │
//! │    149999.6 → Money(150000) when the product enters the cart            │
//! │    Every total after that is exact integer math                         │
//! │                                                                         │
//! │  CLP has zero decimals, so one minor unit = one peso.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use muebleria_core::money::{Currency, Money};
//!
//! let price = Money::from_minor(150_000);
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.minor_units(), 450_000);
//!
//! assert_eq!(Currency::clp().format(line), "$450.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest unit of the store currency.
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction stays total; cart code never produces
///   negative amounts but callers may compute differences
/// - **Single field tuple struct**: Serializes as a bare JSON number, which
///   is what the persisted cart payload stores in `unitPrice`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (pesos for CLP, cents for USD).
    ///
    /// ## Example
    /// ```rust
    /// use muebleria_core::money::Money;
    ///
    /// let price = Money::from_minor(150_000);
    /// assert_eq!(price.minor_units(), 150_000);
    /// ```
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    /// Converts a floating-point major amount into Money, rounding half away
    /// from zero to `decimals` places.
    ///
    /// This is the only float entry point. It exists for product prices that
    /// arrive from the catalog API as JSON numbers and is called once, when a
    /// product is turned into a cart-ready [`crate::Product`].
    ///
    /// ## Example
    /// ```rust
    /// use muebleria_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_rounded(149_999.6, 0).unwrap().minor_units(), 150_000);
    /// assert_eq!(Money::from_major_rounded(10.994, 2).unwrap().minor_units(), 1099);
    /// assert!(Money::from_major_rounded(f64::NAN, 0).is_err());
    /// ```
    pub fn from_major_rounded(amount: f64, decimals: u8) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let scaled = (amount * 10_f64.powi(i32::from(decimals))).round();
        if scaled.abs() >= i64::MAX as f64 {
            return Err(ValidationError::OutOfRange {
                field: "price".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        Ok(Money(scaled as i64))
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Sofá $150.000
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line Total: $450.000
    /// ```
    ///
    /// Saturates at the i64 bounds. The cart rejects lines whose total would
    /// overflow, so saturation only shows up for values built outside it.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Line total, or `None` if it does not fit in i64.
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }

    /// Sum of two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(units) => Some(Money(units)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows raw minor units. Use [`Currency::format`] for shopper-facing text.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Describes the store currency: how many decimals a minor unit represents
/// and how amounts are written for shoppers.
///
/// The storefront sells in Chilean pesos, which have no decimals, so the
/// default is CLP. Missing fields in a serialized form fall back to CLP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    /// ISO 4217 code
    pub code: String,

    /// Symbol placed before the amount
    pub symbol: String,

    /// Number of decimal places in one major unit
    pub decimals: u8,

    /// Digit group separator ("." for es-CL)
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: char,

    /// Decimal separator ("," for es-CL)
    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: char,
}

fn default_thousands_separator() -> char {
    '.'
}

fn default_decimal_separator() -> char {
    ','
}

impl Currency {
    /// Chilean peso: zero decimals, `$150.000` style.
    pub fn clp() -> Self {
        Currency {
            code: "CLP".to_string(),
            symbol: "$".to_string(),
            decimals: 0,
            thousands_separator: default_thousands_separator(),
            decimal_separator: default_decimal_separator(),
        }
    }

    /// Rounds a float price from the catalog into this currency's minor unit.
    pub fn round(&self, amount: f64) -> Result<Money, ValidationError> {
        Money::from_major_rounded(amount, self.decimals)
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use muebleria_core::money::{Currency, Money};
    ///
    /// let clp = Currency::clp();
    /// assert_eq!(clp.format(Money::from_minor(1_234_567)), "$1.234.567");
    /// assert_eq!(clp.format(Money::from_minor(-500)), "-$500");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let units = amount.minor_units();
        let divisor = 10_i64.pow(u32::from(self.decimals));
        let whole = (units / divisor).unsigned_abs();
        let frac = (units % divisor).unsigned_abs();

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(c);
        }

        let sign = if units < 0 { "-" } else { "" };
        if self.decimals == 0 {
            format!("{}{}{}", sign, self.symbol, grouped)
        } else {
            format!(
                "{}{}{}{}{:0width$}",
                sign,
                self.symbol,
                grouped,
                self.decimal_separator,
                frac,
                width = usize::from(self.decimals)
            )
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::clp()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor_units(), 1500);
        assert_eq!((a - b).minor_units(), 500);
        assert_eq!((a * 3).minor_units(), 3000);
    }

    #[test]
    fn test_overflow_is_checked_or_saturated() {
        let huge = Money::from_minor(i64::MAX / 2 + 1);

        assert_eq!(huge.checked_mul_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(
            Money::from_minor(300).checked_mul_quantity(3),
            Some(Money::from_minor(900))
        );

        assert_eq!(huge.multiply_quantity(3).minor_units(), i64::MAX);
        assert_eq!((huge + huge).minor_units(), i64::MAX);
        let total: Money = [huge, huge, huge].into_iter().sum();
        assert_eq!(total.minor_units(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 650].into_iter().map(Money::from_minor).sum();
        assert_eq!(total, Money::from_minor(1000));

        let empty: Money = std::iter::empty().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_rounding_zero_decimals() {
        assert_eq!(Money::from_major_rounded(149_999.5, 0).unwrap().minor_units(), 150_000);
        assert_eq!(Money::from_major_rounded(149_999.4, 0).unwrap().minor_units(), 149_999);
        assert_eq!(Money::from_major_rounded(0.0, 0).unwrap(), Money::zero());
    }

    #[test]
    fn test_rounding_two_decimals() {
        let usd = Currency {
            code: "USD".to_string(),
            symbol: "US$".to_string(),
            decimals: 2,
            thousands_separator: ',',
            decimal_separator: '.',
        };
        assert_eq!(usd.round(10.999).unwrap().minor_units(), 1100);
        assert_eq!(usd.round(10.99).unwrap().minor_units(), 1099);
    }

    #[test]
    fn test_rounding_rejects_non_finite() {
        assert!(Money::from_major_rounded(f64::INFINITY, 0).is_err());
        assert!(Money::from_major_rounded(f64::NAN, 2).is_err());
    }

    #[test]
    fn test_format_clp() {
        let clp = Currency::clp();
        assert_eq!(clp.format(Money::from_minor(0)), "$0");
        assert_eq!(clp.format(Money::from_minor(999)), "$999");
        assert_eq!(clp.format(Money::from_minor(150_000)), "$150.000");
        assert_eq!(clp.format(Money::from_minor(1_234_567)), "$1.234.567");
    }

    #[test]
    fn test_format_with_decimals() {
        let usd = Currency {
            code: "USD".to_string(),
            symbol: "$".to_string(),
            decimals: 2,
            thousands_separator: ',',
            decimal_separator: '.',
        };
        assert_eq!(usd.format(Money::from_minor(123_456)), "$1,234.56");
        assert_eq!(usd.format(Money::from_minor(5)), "$0.05");
        assert_eq!(usd.format(Money::from_minor(-550)), "-$5.50");
    }

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&Money::from_minor(150_000)).unwrap();
        assert_eq!(json, "150000");
    }
}
