//! Promo Code Responses

use jiff::Timestamp;
use pillbox::promo_codes::PromoCodeStatus;
use pillbox_app::domain::promo_codes::models::PromoCode;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use crate::totals::money;

/// Promo Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoCodeResponse {
    pub code: String,

    /// `percentage` or `fixed-amount`
    pub discount_type: String,

    pub amount: f64,

    /// First instant the code can be redeemed
    pub starts_at: String,

    /// Last instant the code can be redeemed
    pub ends_at: String,

    /// Whether the code is switched on and inside its window right now
    pub redeemable: bool,
}

impl PromoCodeResponse {
    pub(crate) fn at(promo_code: PromoCode, now: Timestamp) -> Self {
        let terms = promo_code.terms;

        Self {
            redeemable: terms.status == PromoCodeStatus::Active && terms.is_within_window(now),
            discount_type: terms.rule.kind().as_str().to_string(),
            amount: money(terms.rule.amount()),
            starts_at: terms.starts_at.to_string(),
            ends_at: terms.ends_at.to_string(),
            code: terms.code,
        }
    }
}
