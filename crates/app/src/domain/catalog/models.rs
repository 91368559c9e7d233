//! Catalog Models

use jiff::Timestamp;
use pillbox::{
    discounts::DiscountRule,
    pricing::{self, LinePrice, OfferPlanStatus, Quantity},
};
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Offer Plan UUID
pub type OfferPlanUuid = TypedUuid<OfferPlan>;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Pack Size UUID
pub type PackSizeUuid = TypedUuid<PackSize>;

/// Offer Plan Model
#[derive(Debug, Clone, PartialEq)]
pub struct OfferPlan {
    pub uuid: OfferPlanUuid,
    pub name: String,
    pub rule: DiscountRule,
    pub status: OfferPlanStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OfferPlan {
    /// The plan as the pricing engine sees it.
    #[must_use]
    pub fn as_pricing(&self) -> pricing::OfferPlan {
        pricing::OfferPlan {
            rule: self.rule,
            status: self.status,
        }
    }
}

/// New Offer Plan Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOfferPlan {
    pub uuid: OfferPlanUuid,
    pub name: String,
    pub rule: DiscountRule,
}

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub title: String,
    pub slug: String,
    pub offer_plan: Option<OfferPlan>,
    pub pack_sizes: Vec<PackSize>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub slug: String,
    pub offer_plan: Option<OfferPlanUuid>,
}

/// Pack Size Model
#[derive(Debug, Clone, PartialEq)]
pub struct PackSize {
    pub uuid: PackSizeUuid,
    pub product: ProductUuid,
    pub size: String,
    pub price: Decimal,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Pack Size Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewPackSize {
    pub uuid: PackSizeUuid,
    pub product: ProductUuid,
    pub size: String,
    pub price: Decimal,
}

/// Live price of a pack size, together with its product's offer plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PackSizeQuote {
    pub pack_size: PackSizeUuid,
    pub product: ProductUuid,
    pub product_title: String,
    pub size: String,
    pub price: Decimal,
    pub offer_plan: Option<pricing::OfferPlan>,
}

impl PackSizeQuote {
    /// Price `quantity` units at the current catalog price.
    #[must_use]
    pub fn price_line(&self, quantity: Quantity) -> LinePrice {
        pricing::price_line(
            self.price,
            quantity,
            self.offer_plan
                .as_ref()
                .and_then(pricing::OfferPlan::active_rule),
        )
    }
}
