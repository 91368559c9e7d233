//! Order Models

use std::str::FromStr;

use jiff::Timestamp;
use pillbox::{discounts::DiscountRule, pricing::Quantity, totals::Totals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::ValidateEmail;

use crate::{
    domain::{
        carts::models::CartContact,
        catalog::models::{PackSizeUuid, ProductUuid},
        customers::models::CustomerUuid,
        promo_codes::models::PromoCodeUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItem>;

/// A status tag stored in the database was not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status {0:?}")]
pub struct UnknownStatus(pub String);

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a customer may still cancel the order.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        !matches!(self, Self::Delivered)
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

impl PaymentStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A contact field was missing or malformed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContactError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must not be blank")]
    Blank(&'static str),

    #[error("phone must be 8 to 15 digits")]
    InvalidPhone,

    #[error("email must be a valid email address")]
    InvalidEmail,
}

/// Shipping and contact details, all required on an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

impl ContactDetails {
    /// Trim every field and check it is present and well formed.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validated(&self) -> Result<Self, ContactError> {
        let contact = Self {
            name: required("name", &self.name)?,
            email: required("email", &self.email)?,
            phone: required("phone", &self.phone)?,
            address: required("address", &self.address)?,
            city: required("city", &self.city)?,
            state: required("state", &self.state)?,
            country: required("country", &self.country)?,
            zip_code: required("zip_code", &self.zip_code)?,
        };

        if !is_valid_phone(&contact.phone) {
            return Err(ContactError::InvalidPhone);
        }

        if !is_valid_email(&contact.email) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(contact)
    }
}

impl TryFrom<CartContact> for ContactDetails {
    type Error = ContactError;

    fn try_from(contact: CartContact) -> Result<Self, Self::Error> {
        let field =
            |name: &'static str, value: Option<String>| value.ok_or(ContactError::Required(name));

        Self {
            name: field("name", contact.name)?,
            email: field("email", contact.email)?,
            phone: field("phone", contact.phone)?,
            address: field("address", contact.address)?,
            city: field("city", contact.city)?,
            state: field("state", contact.state)?,
            country: field("country", contact.country)?,
            zip_code: field("zip_code", contact.zip_code)?,
        }
        .validated()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ContactError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ContactError::Required(field));
    }

    Ok(value.to_string())
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    (8..=15).contains(&phone.len()) && phone.bytes().all(|byte| byte.is_ascii_digit())
}

/// Single-label domains such as `localhost` are accepted by `validate_email` but not here.
pub(crate) fn is_valid_email(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

/// A line requested on a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product: ProductUuid,
    pub pack_size: PackSizeUuid,
    pub quantity: Quantity,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub contact: ContactDetails,
    pub items: Vec<NewOrderItem>,
    pub promo_code: Option<String>,
}

/// A frozen order line. Prices are copied from the catalog when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub uuid: OrderItemUuid,
    pub order: OrderUuid,
    pub product: ProductUuid,
    pub pack_size: PackSizeUuid,
    pub product_title: String,
    pub size: String,
    pub quantity: Quantity,
    pub unit_price: Decimal,
    pub unit_discount: Decimal,
    pub line_subtotal: Decimal,
    pub line_discount: Decimal,
    pub line_total: Decimal,
    pub position: i32,
}

/// The promo code terms an order was placed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPromoCode {
    /// Cleared if the promo code row is later removed.
    pub uuid: Option<PromoCodeUuid>,
    pub code: String,
    pub rule: DiscountRule,
}

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub customer: CustomerUuid,
    pub contact: ContactDetails,
    pub items: Vec<OrderItem>,
    pub promo_code: Option<AppliedPromoCode>,
    pub totals: Totals,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_detail: Option<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Changes a customer may make to a placed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdate {
    pub cancel: bool,
    pub payment_status: Option<PaymentStatus>,
    pub payment_detail: Option<Value>,
}
