//! # Money Module
//!
//! Provides the `Money` type for monetary values in Brazilian reais.
//!
//! ## Why Not Floating Point?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    (1.005).toFixed(2) = "1.00"      ❌ WRONG! (should be 1.01)          │
//! │                                                                         │
//! │  OUR SOLUTION: base-10 Decimal, rounded to centavos at every stage      │
//! │    1.005 → 1.01 (half away from zero), exactly, every time              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! Every `Money` value is rounded to 2 fraction digits with
//! round-half-away-from-zero when it is created. Calculators build each
//! waterfall stage as a `Money`, so downstream stages consume the already
//! rounded upstream value.
//!
//! ## Usage
//! ```rust
//! use licita_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_cents(1099); // R$ 10,99
//! let doubled = price * Decimal::from(2);
//! assert_eq!(doubled, Money::from_cents(2198));
//!
//! // Rounds half away from zero
//! let rounded = Money::from_decimal(Decimal::new(1005, 3)); // 1.005
//! assert_eq!(rounded, Money::from_cents(101));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

use crate::types::Percentage;

/// Number of fraction digits every monetary value is reported with.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value rounded to centavos.
///
/// ## Design Decisions
/// - **Decimal (not f64)**: exact base-10 arithmetic
/// - **Rounded on construction**: no `Money` ever carries sub-centavo digits
/// - **Signed**: differences may be negative, inputs are validated elsewhere
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  unit cost ──► tax ──► freight ──► profit ──► unit price ──► total      │
/// │                                                                         │
/// │  direct cost ──► overhead + profit (BDI) ──► tax ──► final price        │
/// │                                                                         │
/// │  proposal items ──► subtotal ──► company tax ──► proposal total         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use licita_core::money::Money;
    ///
    /// let price = Money::from_cents(13860);
    /// assert_eq!(price.to_string(), "R$ 138,60");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_DECIMAL_PLACES))
    }

    /// Creates a Money value from an arbitrary-precision decimal, rounding
    /// half away from zero to 2 fraction digits.
    ///
    /// This is the single rounding point of the crate.
    pub fn from_decimal(value: Decimal) -> Self {
        let mut rounded = value
            .round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(MONEY_DECIMAL_PLACES);
        Money(rounded)
    }

    /// Returns the amount as a decimal with exactly 2 fraction digits.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub fn zero() -> Self {
        Money::from_cents(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Applies a percentage to this amount, rounding the result.
    ///
    /// ## Example
    /// ```rust
    /// use licita_core::money::Money;
    /// use licita_core::types::Percentage;
    /// use rust_decimal::Decimal;
    ///
    /// let cost = Money::from_cents(11000); // R$ 110,00
    /// let rate = Percentage::new("freight", Decimal::from(5)).unwrap();
    ///
    /// assert_eq!(cost.percent(rate), Money::from_cents(550));
    /// ```
    pub fn percent(&self, rate: Percentage) -> Money {
        Money::from_decimal(rate.of(self.0))
    }

    /// Multiplies money by a (possibly fractional) quantity, rounding the result.
    ///
    /// ## Example
    /// ```rust
    /// use licita_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let unit_price = Money::from_cents(13860);
    /// assert_eq!(unit_price.times(Decimal::from(2)), Money::from_cents(27720));
    /// ```
    #[inline]
    pub fn times(&self, quantity: Decimal) -> Money {
        Money::from_decimal(self.0 * quantity)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// pt-BR display: `R$ 1.552,50`.
///
/// ## Note
/// Intended for logs and the seed binary. Documents are rendered by the
/// templating layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let plain = format!("{:.2}", self.0.abs());
        let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, digit) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        write!(f, "{}R$ {},{}", sign, grouped, fraction)
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

/// Multiplication by a decimal quantity, see [`Money::times`].
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: Decimal) -> Self {
        self.times(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

// Serialized as a JSON number (`138.6`), the shape the front end reads.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Ok(Money::from_decimal(value))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
