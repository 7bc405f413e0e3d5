//! Pricing

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors that can occur while constructing a percentage.
#[derive(Debug, Error, PartialEq)]
pub enum PercentError {
    /// The value lies outside `[0, 100]`.
    #[error("percentage {0} is outside the range 0 to 100")]
    OutOfRange(Decimal),
}

/// A percentage in the closed range `[0, 100]`, expressed in percent points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Zero percent.
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    /// Create a percentage from percent points.
    ///
    /// # Errors
    ///
    /// Returns [`PercentError::OutOfRange`] when `points` is negative or above one hundred.
    pub fn new(points: Decimal) -> Result<Self, PercentError> {
        if points < Decimal::ZERO || points > Decimal::ONE_HUNDRED {
            return Err(PercentError::OutOfRange(points));
        }

        Ok(Self(points))
    }

    /// Percent points, e.g. `19` for nineteen percent.
    #[must_use]
    pub fn points(self) -> Decimal {
        self.0
    }

    /// The share of `amount` this percentage represents.
    #[must_use]
    pub fn of(self, amount: Decimal) -> Decimal {
        amount * self.0 / Decimal::ONE_HUNDRED
    }

    /// What remains of `amount` once this percentage is taken off.
    #[must_use]
    pub fn off(self, amount: Decimal) -> Decimal {
        amount * (Decimal::ONE_HUNDRED - self.0) / Decimal::ONE_HUNDRED
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = PercentError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = <Decimal as Deserialize>::deserialize(deserializer)?;

        Self::new(points).map_err(serde::de::Error::custom)
    }
}

/// Price of `quantity` units at `unit_price` after a per-line `discount`.
///
/// Computed as `quantity × unit_price × (1 − discount / 100)` in exact decimal arithmetic.
#[must_use]
pub fn line_total(quantity: u32, unit_price: Decimal, discount: Percent) -> Decimal {
    discount.off(unit_price * Decimal::from(quantity))
}
