//! Exact price arithmetic in integer minor units.
//!
//! Prices are stored as whole cents so cart totals never drift, no matter how
//! many quantity updates a cart goes through. The decimal view is only built
//! at the edges (serialization and display).

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

const CENTS_PER_UNIT: u64 = 100;

/// Errors that can occur when converting a decimal amount into a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has fractions of a cent.
    #[error("price {0} is more precise than one cent")]
    SubCentPrecision(Decimal),
    /// The amount does not fit in the supported range.
    #[error("price is out of range")]
    OutOfRange,
}

/// A non-negative amount of money in the store currency (USD).
///
/// Serialized as a decimal amount, e.g. `"599.00"`. Deserialization accepts
/// JSON numbers and decimal strings.
///
/// ```
/// use luxe_core::Price;
///
/// let gown = Price::from_major(599);
/// let sweater = Price::from_major(299);
/// let total: Price = [gown.times(2), sweater].into_iter().sum();
///
/// assert_eq!(total, Price::from_major(1497));
/// assert_eq!(total.to_string(), "$1,497.00");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price {
    cents: u64,
}

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self { cents: 0 };

    /// Create a price from minor units (cents).
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Create a price from whole major units (dollars).
    #[must_use]
    pub const fn from_major(units: u64) -> Self {
        Self {
            cents: units.saturating_mul(CENTS_PER_UNIT),
        }
    }

    /// Amount in minor units.
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.cents
    }

    /// Exact decimal amount in major units, always with two decimal places.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.cents), 2)
    }

    /// Price of `quantity` units. Saturates instead of overflowing.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            cents: self.cents.saturating_mul(u64::from(quantity)),
        }
    }

    /// Returns true if the price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.cents == 0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        if amount < Decimal::ZERO {
            return Err(PriceError::Negative);
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(PriceError::OutOfRange)?;
        if !cents.fract().is_zero() {
            return Err(PriceError::SubCentPrecision(amount));
        }

        cents
            .trunc()
            .to_u64()
            .map(Self::from_cents)
            .ok_or(PriceError::OutOfRange)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = (self.cents / CENTS_PER_UNIT).to_string();
        let minor = self.cents % CENTS_PER_UNIT;

        // Group the major units in threes: 1234567 -> 1,234,567
        let mut grouped = String::with_capacity(units.len() + units.len() / 3);
        for (i, digit) in units.chars().enumerate() {
            if i > 0 && (units.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        write!(f, "${grouped}.{minor:02}")
    }
}
