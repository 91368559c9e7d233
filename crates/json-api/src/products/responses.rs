//! Product Responses

use pillbox::{
    discounts::DiscountRule,
    pricing::{Quantity, price_line},
};
use pillbox_app::domain::catalog::models::{OfferPlan, PackSize, Product};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::totals::money;

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    pub title: String,

    pub slug: String,

    /// The standing discount attached to the product
    pub offer_plan: Option<OfferPlanResponse>,

    /// Purchasable pack sizes with their live prices
    pub pack_sizes: Vec<PackSizeResponse>,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let rule = product
            .offer_plan
            .as_ref()
            .map(OfferPlan::as_pricing)
            .and_then(|plan| plan.active_rule().copied());

        Self {
            uuid: product.uuid.into_uuid(),
            title: product.title,
            slug: product.slug,
            pack_sizes: product
                .pack_sizes
                .into_iter()
                .map(|pack_size| PackSizeResponse::priced(pack_size, rule.as_ref()))
                .collect(),
            offer_plan: product.offer_plan.map(OfferPlanResponse::from),
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        }
    }
}

/// Offer Plan Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OfferPlanResponse {
    pub uuid: Uuid,

    pub name: String,

    /// `percentage` or `fixed-amount`
    pub discount_type: String,

    pub amount: f64,

    /// `active` or `inactive`
    pub status: String,
}

impl From<OfferPlan> for OfferPlanResponse {
    fn from(plan: OfferPlan) -> Self {
        Self {
            uuid: plan.uuid.into_uuid(),
            name: plan.name,
            discount_type: plan.rule.kind().as_str().to_string(),
            amount: money(plan.rule.amount()),
            status: plan.status.as_str().to_string(),
        }
    }
}

/// Pack Size Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PackSizeResponse {
    pub uuid: Uuid,

    /// Pack size label, e.g. "60 capsules"
    pub size: String,

    /// Price of one unit before the offer plan
    pub price: f64,

    /// Price of one unit after the offer plan
    pub offer_price: f64,
}

impl PackSizeResponse {
    fn priced(pack_size: PackSize, rule: Option<&DiscountRule>) -> Self {
        let line = price_line(pack_size.price, Quantity::ONE, rule);

        Self {
            uuid: pack_size.uuid.into_uuid(),
            size: pack_size.size,
            price: money(pack_size.price),
            offer_price: money(line.total),
        }
    }
}
