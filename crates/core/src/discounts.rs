//! Discounts

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to discount rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Discount amounts can never be negative.
    #[error("discount amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// The discount type tag was not recognised.
    #[error("unknown discount type {0:?}; expected \"percentage\" or \"fixed-amount\"")]
    UnknownKind(String),
}

/// How a discount amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountKind {
    /// The amount is a percentage (0-100) of the base it is applied to.
    #[serde(rename = "percentage")]
    Percentage,

    /// The amount is a flat value, independent of the base.
    #[serde(rename = "fixed-amount")]
    FixedAmount,
}

impl DiscountKind {
    /// Canonical string tag, as stored and serialized.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::FixedAmount => "fixed-amount",
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountKind {
    type Err = DiscountError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "percentage" => Ok(Self::Percentage),
            "fixed-amount" => Ok(Self::FixedAmount),
            other => Err(DiscountError::UnknownKind(other.to_string())),
        }
    }
}

/// A single discount, either from a product offer plan or a promo code.
///
/// Percentages are not capped at 100 and fixed amounts are not capped at the base they are
/// applied to, so a rule can push a price below zero. Callers see the literal result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountRule {
    kind: DiscountKind,
    amount: Decimal,
}

impl DiscountRule {
    /// Create a discount rule.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::NegativeAmount`] if `amount` is below zero.
    pub fn new(kind: DiscountKind, amount: Decimal) -> Result<Self, DiscountError> {
        if amount < Decimal::ZERO {
            return Err(DiscountError::NegativeAmount(amount));
        }

        Ok(Self { kind, amount })
    }

    /// Percentage discount, e.g. `percentage(10)` for 10% off.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::NegativeAmount`] if `percent` is below zero.
    pub fn percentage(percent: impl Into<Decimal>) -> Result<Self, DiscountError> {
        Self::new(DiscountKind::Percentage, percent.into())
    }

    /// Flat discount of `amount`.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::NegativeAmount`] if `amount` is below zero.
    pub fn fixed_amount(amount: impl Into<Decimal>) -> Result<Self, DiscountError> {
        Self::new(DiscountKind::FixedAmount, amount.into())
    }

    /// How the amount is interpreted.
    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// The raw discount amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The discount this rule takes off `base`. The result is never rounded.
    pub fn apply(&self, base: Decimal) -> Decimal {
        match self.kind {
            DiscountKind::Percentage => base * self.amount / Decimal::ONE_HUNDRED,
            DiscountKind::FixedAmount => self.amount,
        }
    }
}
