//! Shared monetary response shapes.

use pillbox::totals::{Totals, round_money};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// A monetary value as a JSON number with two decimal places.
pub(crate) fn money(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Totals Response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct TotalsResponse {
    /// Sum of the lines before any discount
    pub subtotal: f64,

    /// Sum of the lines after offer plans, before the promo code
    pub total: f64,

    /// Discount taken by the promo code
    pub promo_discount: f64,

    /// Shipping charge
    pub shipping_charge: f64,

    /// Amount due
    pub grand_total: f64,
}

impl From<&Totals> for TotalsResponse {
    fn from(totals: &Totals) -> Self {
        Self {
            subtotal: money(totals.subtotal),
            total: money(totals.total),
            promo_discount: money(totals.promo_discount),
            shipping_charge: money(totals.shipping_charge),
            grand_total: money(totals.grand_total),
        }
    }
}
