//! Cart Responses

use pillbox_app::domain::{
    carts::models::{PricedCart, PricedCartItem},
    promo_codes::models::PromoCode,
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::contact::CartContactBody,
    totals::{TotalsResponse, money},
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The customer the cart belongs to, if signed in
    pub customer_uuid: Option<Uuid>,

    /// Contact details collected so far
    pub contact: CartContactBody,

    /// The lines in the cart, priced with live catalog prices
    pub items: Vec<CartItemResponse>,

    /// The promo code attached to the cart
    pub promo_code: Option<AppliedPromoCodeResponse>,

    /// Cart totals. Shipping is charged at checkout.
    pub totals: TotalsResponse,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<PricedCart> for CartResponse {
    fn from(cart: PricedCart) -> Self {
        CartResponse {
            uuid: cart.uuid.into_uuid(),
            customer_uuid: cart.customer.map(Into::into),
            contact: cart.contact.into(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            promo_code: cart.promo_code.map(AppliedPromoCodeResponse::from),
            totals: TotalsResponse::from(&cart.totals),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub product_title: String,

    pub pack_size_uuid: Uuid,

    /// Pack size label, e.g. "60 capsules"
    pub size: String,

    pub quantity: u32,

    /// Price of one unit before the offer plan
    pub unit_price: f64,

    /// Offer plan discount on one unit
    pub unit_discount: f64,

    /// `unit_price * quantity`
    pub subtotal: f64,

    /// Offer plan discount across the line
    pub discount: f64,

    /// What the line costs after the offer plan
    pub total: f64,
}

impl From<PricedCartItem> for CartItemResponse {
    fn from(item: PricedCartItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product.into_uuid(),
            product_title: item.product_title,
            pack_size_uuid: item.pack_size.into_uuid(),
            size: item.size,
            quantity: item.price.quantity.get(),
            unit_price: money(item.price.unit_price),
            unit_discount: money(item.price.unit_discount()),
            subtotal: money(item.price.original_subtotal),
            discount: money(item.price.discount),
            total: money(item.price.total),
        }
    }
}

/// Applied Promo Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AppliedPromoCodeResponse {
    pub code: String,

    /// `percentage` or `fixed-amount`
    pub discount_type: String,

    pub amount: f64,
}

impl From<PromoCode> for AppliedPromoCodeResponse {
    fn from(promo_code: PromoCode) -> Self {
        Self {
            code: promo_code.terms.code,
            discount_type: promo_code.terms.rule.kind().as_str().to_string(),
            amount: money(promo_code.terms.rule.amount()),
        }
    }
}
