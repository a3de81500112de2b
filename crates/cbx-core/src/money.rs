//! Precision-safe money type.
//!
//! Wraps `rust_decimal` for exact decimal arithmetic, avoiding
//! floating-point rounding errors in prices, sizes, balances and funds.

use crate::error::CoreError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Exact decimal amount.
///
/// Used for every price, size, balance and funds value. Serializes as its
/// decimal string, never as a binary float.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    #[inline]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    #[inline]
    pub fn inner(&self) -> Decimal {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Render with exactly 8 fractional digits, rounding toward zero.
    ///
    /// This is the wire format the exchange expects for order sizes and
    /// prices. Rounding toward zero guarantees no upward drift.
    pub fn to_wire(&self) -> String {
        format!(
            "{:.8}",
            self.0.round_dp_with_strategy(8, RoundingStrategy::ToZero)
        )
    }

    /// Two-digit display, used for USD-denominated values.
    pub fn display_usd(&self) -> String {
        format!(
            "{:.2}",
            self.0.round_dp_with_strategy(2, RoundingStrategy::ToZero)
        )
    }

    /// Eight-digit display, used for BTC-denominated values.
    pub fn display_btc(&self) -> String {
        self.to_wire()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Self(d)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}
