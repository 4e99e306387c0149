//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Inventory value = Σ price × in_stock drifts with every float add.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices are stored as i64 cents. The wire format is still a          │
//! │    decimal number (3.5 = $3.50); conversion happens once, at the       │
//! │    serde boundary, with rounding to the nearest cent.                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sweetshop_core::money::Money;
//!
//! let price = Money::from_cents(350); // $3.50
//! let stock_value = price * 10;        // $35.00
//! assert_eq!(stock_value.cents(), 3500);
//!
//! // Decimal input from JSON is rounded to whole cents
//! assert_eq!(Money::from_decimal(2.99).unwrap().cents(), 299);
//! ```

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

/// Largest price accepted from decimal input, matching `DECIMAL(10,2)`.
const MAX_DECIMAL_CENTS: i64 = 99_999_999_99;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values can be represented so that
///   validation, not parsing, is what rejects a negative price
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Decimal serde**: serialized as `3.5`, not `350`, so the JSON
///   contract matches the `DECIMAL(10,2)` column clients expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (as received from JSON) to cents.
    ///
    /// Rounds half away from zero to the nearest cent. Returns `None` for
    /// non-finite input or amounts outside `DECIMAL(10,2)`.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(3.5).unwrap().cents(), 350);
    /// assert_eq!(Money::from_decimal(0.105).unwrap().cents(), 11);
    /// assert!(Money::from_decimal(f64::NAN).is_none());
    /// ```
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        // 0.105 is stored as 0.10499..; nudge away from zero before rounding.
        let scaled = amount * 100.0;
        let cents = (scaled + scaled.signum() * 1e-7).round();

        if cents.abs() > MAX_DECIMAL_CENTS as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value as a decimal amount (for serialization/display only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Multiplies money by a stock quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.multiply_quantity(15).cents(), 4485);
    /// assert_eq!(unit_price.multiply_quantity(i64::MAX).cents(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Narrows a wide cent total, saturating at the `i64` bounds.
    pub fn from_cents_saturating(cents: i128) -> Self {
        Money(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Divides evenly across `count` items, rounding half up to the cent.
    ///
    /// Returns zero for an empty set.
    pub fn average_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        let count = count as i128;
        let total = self.0 as i128;
        let rounded = if total >= 0 {
            (total + count / 2) / count
        } else {
            (total - count / 2) / count
        };
        Money(rounded as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Parses a decimal string such as `"3.50"`.
impl FromStr for Money {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: f64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a decimal amount", s))?;
        Money::from_decimal(amount).ok_or_else(|| format!("'{}' is out of range", s))
    }
}

// =============================================================================
// Serde: decimal on the wire
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

/// Accepts a JSON number (`3.5`) or a decimal string (`"3.50"`), the two
/// shapes a `DECIMAL` column produces in client code.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalRepr {
            Number(f64),
            Text(String),
        }

        match DecimalRepr::deserialize(deserializer)? {
            DecimalRepr::Number(n) => Money::from_decimal(n)
                .ok_or_else(|| de::Error::custom(format!("price {} is out of range", n))),
            DecimalRepr::Text(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
