//! Pillbox prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{DiscountError, DiscountKind, DiscountRule},
    pricing::{LinePrice, OfferPlan, OfferPlanStatus, PricingError, Quantity, price_line},
    promo_codes::{PromoCode, PromoCodeError, PromoCodeStatus},
    totals::{ShippingPolicy, Totals, TotalsError, aggregate, round_money},
};
