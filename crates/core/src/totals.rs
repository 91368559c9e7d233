//! Cart and order totals

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{discounts::DiscountRule, pricing::LinePrice};

/// Number of decimal places reported totals are rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Orders above this total (after offer plans, before promo codes) ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(199, 0, 0, false, 0);

/// Flat shipping charge for orders at or below [`FREE_SHIPPING_THRESHOLD`].
pub const FLAT_SHIPPING_CHARGE: Decimal = Decimal::from_parts(25, 0, 0, false, 0);

/// Errors converting totals for collaborators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TotalsError {
    /// The amount does not fit in minor units.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),
}

/// How shipping is charged when totalling lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingPolicy {
    /// No shipping charge. Used for cart previews, which show shipping separately.
    Excluded,

    /// Charge `charge` unless the post-offer total is strictly greater than `threshold`.
    FlatBelowThreshold {
        /// Totals above this ship for free.
        threshold: Decimal,

        /// Charge applied otherwise.
        charge: Decimal,
    },
}

impl ShippingPolicy {
    /// The policy applied when an order is placed.
    pub const fn checkout() -> Self {
        Self::FlatBelowThreshold {
            threshold: FREE_SHIPPING_THRESHOLD,
            charge: FLAT_SHIPPING_CHARGE,
        }
    }

    /// Shipping charge for a post-offer, pre-promo `total`.
    pub fn charge_for(&self, total: Decimal) -> Decimal {
        match self {
            Self::Excluded => Decimal::ZERO,
            Self::FlatBelowThreshold { threshold, charge } => {
                if total > *threshold {
                    Decimal::ZERO
                } else {
                    *charge
                }
            }
        }
    }
}

/// Reported totals for a cart or order, rounded to [`MONEY_DECIMAL_PLACES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// Sum of line prices before any discount.
    pub subtotal: Decimal,

    /// Sum of line totals after offer plans, before the promo code.
    pub total: Decimal,

    /// Discount taken off `total` by the promo code.
    pub promo_discount: Decimal,

    /// Shipping charge added by the shipping policy.
    pub shipping_charge: Decimal,

    /// `total - promo_discount + shipping_charge`.
    pub grand_total: Decimal,
}

impl Totals {
    /// Totals of an empty cart.
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        total: Decimal::ZERO,
        promo_discount: Decimal::ZERO,
        shipping_charge: Decimal::ZERO,
        grand_total: Decimal::ZERO,
    };

    /// The grand total as money in `currency`, which must use two minor digits.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError::OutOfRange`] if the total does not fit in minor units.
    pub fn grand_total_money<'a>(
        &self,
        currency: &'a Currency,
    ) -> Result<Money<'a, Currency>, TotalsError> {
        let mut amount = round_money(self.grand_total);
        amount.rescale(MONEY_DECIMAL_PLACES);

        let minor = i64::try_from(amount.mantissa())
            .map_err(|_overflow| TotalsError::OutOfRange(self.grand_total))?;

        Ok(Money::from_minor(minor, currency))
    }
}

/// Round a monetary value for reporting.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Total up priced lines, apply the promo code once to the aggregate and add shipping.
///
/// Sums are carried at full precision and every reported value is rounded exactly once at the
/// end, so per-line fractions of a cent never compound.
pub fn aggregate<'a, I>(
    lines: I,
    promo: Option<&DiscountRule>,
    shipping: ShippingPolicy,
) -> Totals
where
    I: IntoIterator<Item = &'a LinePrice>,
{
    let (subtotal, total) = lines
        .into_iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(subtotal, total), line| {
            (subtotal + line.original_subtotal, total + line.total)
        });

    let promo_discount = promo.map_or(Decimal::ZERO, |rule| rule.apply(total));
    let shipping_charge = shipping.charge_for(total);
    let grand_total = total - promo_discount + shipping_charge;

    Totals {
        subtotal: round_money(subtotal),
        total: round_money(total),
        promo_discount: round_money(promo_discount),
        shipping_charge: round_money(shipping_charge),
        grand_total: round_money(grand_total),
    }
}
