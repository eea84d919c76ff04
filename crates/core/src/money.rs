//! # Money Module
//!
//! Monetary amounts held as integer cents so that balance arithmetic stays
//! exact in storage, exposed as `rust_decimal::Decimal` at the API.

use crate::error::{CoreError, CoreResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of fractional digits a monetary amount may carry.
pub const MONEY_SCALE: u32 = 2;

/// An amount of money in minor units (cents).
///
/// # Examples
/// ```
/// use tellerbank_core::Money;
/// use rust_decimal::Decimal;
///
/// let m = Money::try_from_decimal(Decimal::new(10050, 2)).unwrap();
/// assert_eq!(m.cents(), 10050);
/// assert_eq!(m.to_string(), "100.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Create from a raw cent count
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Raw cent count
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rejecting more than two fractional digits
    /// and values that do not fit in cents.
    pub fn try_from_decimal(amount: Decimal) -> CoreResult<Self> {
        let scaled = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| CoreError::InvalidAmount(format!("{} is out of range", amount)))?;

        if !scaled.fract().is_zero() {
            return Err(CoreError::InvalidAmount(format!(
                "{} has more than {} decimal places",
                amount, MONEY_SCALE
            )));
        }

        scaled
            .to_i64()
            .map(Self)
            .ok_or_else(|| CoreError::InvalidAmount(format!("{} is out of range", amount)))
    }

    /// Convert a decimal amount that must be strictly positive
    pub fn positive(amount: Decimal) -> CoreResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be greater than zero: {}",
                amount
            )));
        }
        Self::try_from_decimal(amount)
    }

    /// Decimal view with two fractional digits
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Negated amount (withdrawals are recorded with a negative sign)
    pub const fn negated(&self) -> Self {
        Self(-self.0)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}
