//! Monetary amounts stored as whole minor currency units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor units in one major unit.
const MINOR_PER_MAJOR: i64 = 100;

/// A signed amount of money in minor units (cents).
///
/// Integer storage keeps billed, paid and balance figures exact, so
/// `balance == billed - paid` holds without a rounding tolerance.
///
/// # Examples
///
/// ```
/// use foreman::task::domain::Money;
///
/// let billed = Money::from_major_units(2_500);
/// let paid = Money::from_major_units(1_500);
/// assert_eq!(billed.saturating_sub(paid), Money::from_major_units(1_000));
/// assert_eq!(billed.to_string(), "2500.00");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_minor_units(value: i64) -> Self {
        Self(value)
    }

    /// Creates an amount from whole major units.
    #[must_use]
    pub const fn from_major_units(value: i64) -> Self {
        Self(value.saturating_mul(MINOR_PER_MAJOR))
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns `true` for amounts below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns `true` for amounts above zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Adds two amounts, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts two amounts, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let major = magnitude.div_euclid(MINOR_PER_MAJOR.unsigned_abs());
        let minor = magnitude.rem_euclid(MINOR_PER_MAJOR.unsigned_abs());
        write!(f, "{sign}{major}.{minor:02}")
    }
}
