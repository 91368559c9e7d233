//! Test Helpers

use jiff::{SignedDuration, Timestamp};
use pillbox::discounts::DiscountRule;
use rust_decimal::Decimal;

use crate::{
    domain::{
        catalog::{
            CatalogService, CatalogServiceError,
            models::{
                NewOfferPlan, NewPackSize, NewProduct, OfferPlan, OfferPlanUuid, PackSize, PackSizeUuid,
                Product, ProductUuid,
            },
        },
        customers::{
            CustomersService, CustomersServiceError,
            models::{Customer, CustomerUuid, NewCustomer},
        },
        promo_codes::{
            PromoCodesService, PromoCodesServiceError,
            models::{NewPromoCode, PromoCode, PromoCodeUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_offer_plan(
    ctx: &TestContext,
    rule: DiscountRule,
) -> Result<OfferPlan, CatalogServiceError> {
    ctx.catalog
        .create_offer_plan(NewOfferPlan {
            uuid: OfferPlanUuid::new(),
            name: format!("{} {}", rule.kind().as_str(), rule.amount()),
            rule,
        })
        .await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    slug: &str,
    offer_plan: Option<OfferPlanUuid>,
) -> Result<Product, CatalogServiceError> {
    ctx.catalog
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            title: slug.replace('-', " "),
            slug: slug.to_string(),
            offer_plan,
        })
        .await
}

pub(crate) async fn create_pack_size(
    ctx: &TestContext,
    product: ProductUuid,
    size: &str,
    price: Decimal,
) -> Result<PackSize, CatalogServiceError> {
    ctx.catalog
        .create_pack_size(NewPackSize {
            uuid: PackSizeUuid::new(),
            product,
            size: size.to_string(),
            price,
        })
        .await
}

pub(crate) async fn create_customer(
    ctx: &TestContext,
    email: &str,
) -> Result<Customer, CustomersServiceError> {
    let name = email.split('@').next().unwrap_or(email).to_string();

    ctx.customers
        .create_customer(NewCustomer {
            uuid: CustomerUuid::new(),
            name,
            email: email.to_string(),
        })
        .await
}

/// An active code valid from yesterday until thirty days from now.
pub(crate) async fn create_promo_code(
    ctx: &TestContext,
    code: &str,
    rule: DiscountRule,
) -> Result<PromoCode, PromoCodesServiceError> {
    let now = Timestamp::now();

    ctx.promo_codes
        .create_promo_code(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: code.to_string(),
            rule,
            starts_at: now - SignedDuration::from_hours(24),
            ends_at: now + SignedDuration::from_hours(24 * 30),
        })
        .await
}
