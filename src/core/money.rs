//! Decimal-safe money handling.
//!
//! Amounts are persisted as integer cents and surfaced as [`Money`], which
//! converts to and from `rust_decimal::Decimal` with exactly two decimal
//! places. No floating point is involved anywhere in price or balance
//! arithmetic.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::{fmt, iter::Sum, ops, str::FromStr};

/// Number of decimal places carried by every amount.
pub const SCALE: u32 = 2;

/// An amount of money with cent precision. May be negative.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money {
    cents: i64,
}

impl Money {
    /// Zero.
    pub const ZERO: Self = Self { cents: 0 };

    /// Builds an amount from integer cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// The amount in integer cents, as stored in the database.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.cents
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.cents == 0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.cents < 0
    }

    /// The amount as a two-place decimal.
    #[must_use]
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.cents, SCALE)
    }

    /// Converts a decimal into money.
    ///
    /// # Errors
    /// Returns `InvalidAmount` when the value carries more than two significant
    /// decimal places or does not fit into the cent range.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let normalized = value.normalize();
        if normalized.scale() > SCALE {
            return Err(Error::InvalidAmount {
                input: value.to_string(),
            });
        }
        let cents = (normalized * Decimal::ONE_HUNDRED)
            .to_i64()
            .ok_or_else(|| Error::InvalidAmount {
                input: value.to_string(),
            })?;
        Ok(Self { cents })
    }

    /// Parses an amount typed by a person.
    ///
    /// Accepts an optional euro sign, surrounding whitespace and a decimal
    /// comma, so `"€1,50"`, `"1.50"` and `" 1,5 "` all mean one euro fifty.
    ///
    /// # Errors
    /// Returns `InvalidAmount` for anything that is not a plain decimal
    /// number with at most two decimal places.
    pub fn parse(input: &str) -> Result<Self> {
        let cleaned = input.replace('€', "").replace(',', ".");
        let cleaned = cleaned.trim();
        let invalid = || Error::InvalidAmount {
            input: input.to_string(),
        };
        if cleaned.is_empty() || cleaned.contains(['e', 'E']) {
            return Err(invalid());
        }
        let value = Decimal::from_str(cleaned).map_err(|_| invalid())?;
        Self::from_decimal(value).map_err(|_| invalid())
    }

    /// Unit price times quantity.
    ///
    /// # Errors
    /// Returns `InvalidAmount` on overflow.
    pub fn times(self, quantity: u32) -> Result<Self> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Self::from_cents)
            .ok_or_else(|| Error::InvalidAmount {
                input: format!("{self} x {quantity}"),
            })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{}", self.to_decimal())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Money {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_decimal().to_string()
    }
}

impl ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_cents(self.cents + rhs.cents)
    }
}

impl ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents += rhs.cents;
    }
}

impl ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_cents(self.cents - rhs.cents)
    }
}

impl ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_cents(-self.cents)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_accepts_admin_formats() {
        assert_eq!(Money::parse("1.50").unwrap(), Money::from_cents(150));
        assert_eq!(Money::parse("€1,50").unwrap(), Money::from_cents(150));
        assert_eq!(Money::parse(" 1,5 ").unwrap(), Money::from_cents(150));
        assert_eq!(Money::parse("2").unwrap(), Money::from_cents(200));
        assert_eq!(Money::parse("-5.00").unwrap(), Money::from_cents(-500));
        assert_eq!(Money::parse("0.10").unwrap(), Money::from_cents(10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "€", "abc", "1.505", "1,2,3", "1e3"] {
            let result = Money::parse(input);
            assert!(
                matches!(result, Err(Error::InvalidAmount { .. })),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_trailing_zero_decimals_are_not_extra_precision() {
        assert_eq!(Money::parse("1.5000").unwrap(), Money::from_cents(150));
    }

    #[test]
    fn test_times_and_sum() {
        let espresso = Money::from_cents(150);
        assert_eq!(espresso.times(2).unwrap(), Money::from_cents(300));
        let total: Money = [Money::from_cents(300), Money::from_cents(95)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(395));
        assert!(Money::from_cents(i64::MAX).times(2).is_err());
    }

    #[test]
    fn test_display_keeps_two_places() {
        assert_eq!(Money::from_cents(300).to_string(), "€3.00");
        assert_eq!(Money::from_cents(-5).to_string(), "€-0.05");
        assert_eq!(String::from(Money::from_cents(150)), "1.50");
    }

    #[test]
    fn test_balance_arithmetic_is_exact() {
        let mut balance = Money::from_cents(1000);
        balance += -Money::from_cents(310);
        assert_eq!(balance, Money::from_cents(690));
        assert_eq!(balance - Money::from_cents(700), Money::from_cents(-10));
        assert!((balance - Money::from_cents(700)).is_negative());
    }
}
