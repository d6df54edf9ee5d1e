//! Monetary amounts.

use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Number of fractional digits every amount is normalized to.
pub const MONEY_SCALE: u32 = 2;

/// Immutable, self-validating monetary amount.
///
/// The wrapped decimal always has a scale of exactly [`MONEY_SCALE`], rounded
/// half-up (away from zero on a tie). Equality and hashing therefore compare the
/// normalized value: `Money::of("10.5") == Money::of("10.50")`.
///
/// Arithmetic never mutates the receiver; each operation returns a new,
/// re-normalized value. Overflow is reported as a validation error instead of
/// panicking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money {
    amount: Decimal,
}

impl Money {
    /// Parse an amount from its textual form.
    ///
    /// Accepts plain decimals and scientific notation (`"1E+2"`, `"2.5e-1"`).
    /// Fails with [`DomainError::Validation`] on blank or unparseable input.
    pub fn of(amount: &str) -> DomainResult<Self> {
        let trimmed = amount.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount cannot be blank"));
        }
        let parsed = Decimal::from_str(trimmed)
            .or_else(|e| {
                if trimmed.contains(['e', 'E']) {
                    Decimal::from_scientific(trimmed)
                } else {
                    Err(e)
                }
            })
            .map_err(|e| DomainError::validation(format!("invalid amount '{trimmed}': {e}")))?;
        Ok(Self::from_decimal(parsed))
    }

    /// Wrap an already-parsed decimal, normalizing it to two fractional digits.
    pub fn from_decimal(amount: Decimal) -> Self {
        let mut normalized =
            amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        normalized.rescale(MONEY_SCALE);
        Self { amount: normalized }
    }

    pub fn zero() -> Self {
        Self::from_decimal(Decimal::ZERO)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn add(&self, other: &Money) -> DomainResult<Money> {
        self.amount
            .checked_add(other.amount)
            .map(Self::from_decimal)
            .ok_or_else(|| DomainError::validation("amount overflow on add"))
    }

    pub fn subtract(&self, other: &Money) -> DomainResult<Money> {
        self.amount
            .checked_sub(other.amount)
            .map(Self::from_decimal)
            .ok_or_else(|| DomainError::validation("amount overflow on subtract"))
    }

    /// Scale the amount by a whole quantity (e.g. unit price × quantity).
    pub fn multiply(&self, quantity: i64) -> DomainResult<Money> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(Self::from_decimal)
            .ok_or_else(|| DomainError::validation("amount overflow on multiply"))
    }

    pub fn is_greater_than(&self, other: &Money) -> bool {
        self.amount > other.amount
    }

    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.is_greater_than(&Money::zero())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::of(s)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self::from_decimal(value)
    }
}

impl TryFrom<String> for Money {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::of(&value)
    }
}

impl From<Money> for String {
    fn from(value: Money) -> Self {
        value.to_string()
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.amount, f)
    }
}

impl ValueObject for Money {}
