//! Line item pricing

use std::{fmt, num::NonZeroU32, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discounts::DiscountRule;

/// Highest unit price a pack size may be listed at.
///
/// Together with [`Quantity::MAX`] this keeps every line amount well inside [`Decimal`]'s range.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Errors raised while building pricing inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Line quantities start at one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The quantity did not fit in the supported range.
    #[error("quantity {0} is out of range")]
    QuantityOutOfRange(i64),

    /// The offer plan status tag was not recognised.
    #[error("unknown offer plan status {0:?}")]
    UnknownStatus(String),
}

/// Number of units on a line. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Largest quantity a line can carry. Quantities are stored as `integer` columns.
    pub const MAX: u32 = i32::MAX.unsigned_abs();

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::ZeroQuantity`] for zero and
    /// [`PricingError::QuantityOutOfRange`] above [`Quantity::MAX`].
    pub fn new(value: u32) -> Result<Self, PricingError> {
        if value > Self::MAX {
            return Err(PricingError::QuantityOutOfRange(i64::from(value)));
        }

        NonZeroU32::new(value)
            .map(Self)
            .ok_or(PricingError::ZeroQuantity)
    }

    /// The quantity as a plain integer.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The quantity as a decimal multiplier.
    pub fn as_decimal(self) -> Decimal {
        Decimal::from(self.0.get())
    }
}

impl TryFrom<i32> for Quantity {
    type Error = PricingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let value = u32::try_from(value)
            .map_err(|_negative| PricingError::QuantityOutOfRange(i64::from(value)))?;

        Self::new(value)
    }
}

impl TryFrom<Quantity> for i32 {
    type Error = PricingError;

    fn try_from(quantity: Quantity) -> Result<Self, Self::Error> {
        i32::try_from(quantity.get())
            .map_err(|_overflow| PricingError::QuantityOutOfRange(i64::from(quantity.get())))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Offer plan availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferPlanStatus {
    /// The plan discounts every product it is attached to.
    Active,

    /// The plan is kept but has no effect on prices.
    Inactive,
}

impl OfferPlanStatus {
    /// Canonical string tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for OfferPlanStatus {
    type Err = PricingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(PricingError::UnknownStatus(other.to_string())),
        }
    }
}

/// A standing discount attached to a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferPlan {
    /// The discount applied to each unit.
    pub rule: DiscountRule,

    /// Whether the plan currently applies.
    pub status: OfferPlanStatus,
}

impl OfferPlan {
    /// The rule to price with, if the plan is active.
    pub fn active_rule(&self) -> Option<&DiscountRule> {
        match self.status {
            OfferPlanStatus::Active => Some(&self.rule),
            OfferPlanStatus::Inactive => None,
        }
    }
}

/// Unrounded price breakdown of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePrice {
    /// Price of one unit before any discount.
    pub unit_price: Decimal,

    /// Number of units.
    pub quantity: Quantity,

    /// `unit_price * quantity`.
    pub original_subtotal: Decimal,

    /// Offer plan discount across all units.
    pub discount: Decimal,

    /// What the line costs after the offer plan.
    pub total: Decimal,
}

impl LinePrice {
    /// Offer plan discount on a single unit.
    pub fn unit_discount(&self) -> Decimal {
        self.discount / self.quantity.as_decimal()
    }
}

/// Price a line from its unit price, quantity and optional offer plan rule.
///
/// The offer rule is applied per unit, so fixed-amount offers are taken off every unit rather
/// than once per line. Amounts saturate at the bounds of [`Decimal`] instead of overflowing.
pub fn price_line(
    unit_price: Decimal,
    quantity: Quantity,
    offer: Option<&DiscountRule>,
) -> LinePrice {
    let units = quantity.as_decimal();
    let original_subtotal = unit_price.saturating_mul(units);

    let Some(rule) = offer else {
        return LinePrice {
            unit_price,
            quantity,
            original_subtotal,
            discount: Decimal::ZERO,
            total: original_subtotal,
        };
    };

    let unit_discount = rule.apply(unit_price);

    LinePrice {
        unit_price,
        quantity,
        original_subtotal,
        discount: unit_discount.saturating_mul(units),
        total: unit_price.saturating_sub(unit_discount).saturating_mul(units),
    }
}
