//! Order Requests

use std::str::FromStr;

use pillbox::pricing::{PricingError, Quantity};
use pillbox_app::domain::orders::models::{
    ContactDetails, NewOrder, NewOrderItem, OrderUpdate, PaymentStatus, UnknownStatus,
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::carts::contact::CartContactBody;

/// Shipping and contact details. Every field is required.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactBody {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl From<ContactBody> for ContactDetails {
    fn from(body: ContactBody) -> Self {
        Self {
            name: body.name,
            email: body.email,
            phone: body.phone,
            address: body.address,
            city: body.city,
            state: body.state,
            country: body.country,
            zip_code: body.zip_code,
        }
    }
}

impl From<ContactDetails> for ContactBody {
    fn from(contact: ContactDetails) -> Self {
        Self {
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
            city: contact.city,
            state: contact.state,
            country: contact.country,
            zip_code: contact.zip_code,
        }
    }
}

/// Order Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemRequest {
    pub product_uuid: Uuid,
    pub pack_size_uuid: Uuid,
    pub quantity: u32,
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub contact: ContactBody,

    pub items: Vec<OrderItemRequest>,

    /// Promo code to redeem against the order
    #[serde(default)]
    pub promo_code: Option<String>,
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = PricingError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        let items = request
            .items
            .into_iter()
            .map(|item| {
                Ok(NewOrderItem {
                    product: item.product_uuid.into(),
                    pack_size: item.pack_size_uuid.into(),
                    quantity: Quantity::new(item.quantity)?,
                })
            })
            .collect::<Result<Vec<_>, PricingError>>()?;

        Ok(NewOrder {
            contact: request.contact.into(),
            items,
            promo_code: request
                .promo_code
                .filter(|code| !code.trim().is_empty()),
        })
    }
}

/// Checkout Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CheckoutRequest {
    /// Overrides the contact details stored on the cart
    pub contact: CartContactBody,
}

/// Update Order Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateOrderRequest {
    /// Cancel the order
    pub cancel: bool,

    /// `pending`, `paid` or `cancelled`
    pub payment_status: Option<String>,

    /// Provider specific payment details
    pub payment_detail: Option<Value>,
}

impl TryFrom<UpdateOrderRequest> for OrderUpdate {
    type Error = UnknownStatus;

    fn try_from(request: UpdateOrderRequest) -> Result<Self, Self::Error> {
        Ok(OrderUpdate {
            cancel: request.cancel,
            payment_status: request
                .payment_status
                .as_deref()
                .map(PaymentStatus::from_str)
                .transpose()?,
            payment_detail: request.payment_detail,
        })
    }
}
