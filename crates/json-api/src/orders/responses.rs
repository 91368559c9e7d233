//! Order Responses

use pillbox_app::domain::orders::models::{AppliedPromoCode, Order, OrderItem};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    orders::requests::ContactBody,
    totals::{TotalsResponse, money},
};

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    /// The unique identifier of the order
    pub uuid: Uuid,

    pub customer_uuid: Uuid,

    pub contact: ContactBody,

    /// Lines as priced when the order was placed
    pub items: Vec<OrderItemResponse>,

    pub promo_code: Option<OrderPromoCodeResponse>,

    pub totals: TotalsResponse,

    /// `pending`, `processing`, `confirmed`, `delivered` or `cancelled`
    pub status: String,

    /// `pending`, `paid` or `cancelled`
    pub payment_status: String,

    pub payment_detail: Option<Value>,

    /// The date and time the order was placed
    pub created_at: String,

    /// The date and time the order was last updated
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            customer_uuid: order.customer.into_uuid(),
            contact: order.contact.into(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
            promo_code: order.promo_code.map(OrderPromoCodeResponse::from),
            totals: TotalsResponse::from(&order.totals),
            status: order.status.as_str().to_string(),
            payment_status: order.payment_status.as_str().to_string(),
            payment_detail: order.payment_detail,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub pack_size_uuid: Uuid,
    pub product_title: String,
    pub size: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub unit_discount: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            product_uuid: item.product.into_uuid(),
            pack_size_uuid: item.pack_size.into_uuid(),
            product_title: item.product_title,
            size: item.size,
            quantity: item.quantity.get(),
            unit_price: money(item.unit_price),
            unit_discount: money(item.unit_discount),
            subtotal: money(item.line_subtotal),
            discount: money(item.line_discount),
            total: money(item.line_total),
        }
    }
}

/// Order Promo Code Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderPromoCodeResponse {
    pub code: String,

    /// `percentage` or `fixed-amount`
    pub discount_type: String,

    pub amount: f64,
}

impl From<AppliedPromoCode> for OrderPromoCodeResponse {
    fn from(promo_code: AppliedPromoCode) -> Self {
        Self {
            code: promo_code.code,
            discount_type: promo_code.rule.kind().as_str().to_string(),
            amount: money(promo_code.rule.amount()),
        }
    }
}

/// Orders Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The customer's orders, newest first
    pub orders: Vec<OrderResponse>,
}
