//! Cart Models

use std::net::IpAddr;

use jiff::Timestamp;
use pillbox::{
    pricing::{LinePrice, Quantity},
    totals::Totals,
};

use crate::{
    domain::{
        catalog::models::{PackSizeUuid, ProductUuid},
        customers::models::CustomerUuid,
        orders::models::{ContactError, is_valid_email, is_valid_phone},
        promo_codes::models::PromoCode,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<PricedCart>;

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<PricedCartItem>;

/// Who a cart belongs to: a signed-in customer, a client address, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartIdentity {
    pub customer: Option<CustomerUuid>,
    pub ip: Option<IpAddr>,
}

impl CartIdentity {
    #[must_use]
    pub const fn new(customer: Option<CustomerUuid>, ip: Option<IpAddr>) -> Self {
        Self { customer, ip }
    }

    #[must_use]
    pub const fn customer(customer: CustomerUuid) -> Self {
        Self::new(Some(customer), None)
    }

    #[must_use]
    pub const fn anonymous(ip: IpAddr) -> Self {
        Self::new(None, Some(ip))
    }

    /// Key a newly created cart is stored under. Customers win over addresses.
    #[must_use]
    pub fn key(&self) -> Option<String> {
        match (self.customer, self.ip) {
            (Some(customer), _) => Some(format!("customer:{customer}")),
            (None, Some(ip)) => Some(format!("ip:{ip}")),
            (None, None) => None,
        }
    }

    pub(crate) fn ip_address(&self) -> Option<String> {
        self.ip.map(|ip| ip.to_string())
    }
}

/// Contact details collected on the cart before checkout. All optional until then.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

impl CartContact {
    /// Trim the supplied fields and check they are well formed. Absent fields stay absent.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validated(&self) -> Result<Self, ContactError> {
        let contact = Self {
            name: supplied("name", self.name.as_deref())?,
            email: supplied("email", self.email.as_deref())?,
            phone: supplied("phone", self.phone.as_deref())?,
            address: supplied("address", self.address.as_deref())?,
            city: supplied("city", self.city.as_deref())?,
            state: supplied("state", self.state.as_deref())?,
            country: supplied("country", self.country.as_deref())?,
            zip_code: supplied("zip_code", self.zip_code.as_deref())?,
        };

        if contact.phone.as_deref().is_some_and(|phone| !is_valid_phone(phone)) {
            return Err(ContactError::InvalidPhone);
        }

        if contact.email.as_deref().is_some_and(|email| !is_valid_email(email)) {
            return Err(ContactError::InvalidEmail);
        }

        Ok(contact)
    }
}

fn supplied(field: &'static str, value: Option<&str>) -> Result<Option<String>, ContactError> {
    match value.map(str::trim) {
        Some("") => Err(ContactError::Blank(field)),
        trimmed => Ok(trimmed.map(str::to_string)),
    }
}

/// Desired quantity of a pack size. Replaces any existing quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemUpdate {
    pub product: ProductUuid,
    pub pack_size: PackSizeUuid,
    pub quantity: Quantity,
}

/// Changes submitted to a cart in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartUpdate {
    pub contact: CartContact,
    pub items: Vec<CartItemUpdate>,
}

/// A cart priced with live catalog prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart {
    pub uuid: CartUuid,
    pub customer: Option<CustomerUuid>,
    pub ip_address: Option<String>,
    pub contact: CartContact,
    pub items: Vec<PricedCartItem>,
    pub promo_code: Option<PromoCode>,
    pub totals: Totals,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PricedCart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A cart line priced with the pack size's live price and active offer plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCartItem {
    pub uuid: CartItemUuid,
    pub product: ProductUuid,
    pub product_title: String,
    pub pack_size: PackSizeUuid,
    pub size: String,
    pub price: LinePrice,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn cart_contact_is_trimmed_and_keeps_absent_fields() -> TestResult {
        let contact = CartContact {
            name: Some(" Jane Doe ".to_string()),
            email: Some("jane@example.com ".to_string()),
            ..CartContact::default()
        }
        .validated()?;

        assert_eq!(contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(contact.email.as_deref(), Some("jane@example.com"));
        assert_eq!(contact.phone, None);

        Ok(())
    }

    #[test]
    fn malformed_cart_contact_is_rejected() {
        let bad_email = CartContact {
            email: Some("not-an-email".to_string()),
            ..CartContact::default()
        };

        let bad_phone = CartContact {
            phone: Some("555-CALL-NOW".to_string()),
            ..CartContact::default()
        };

        let blank_city = CartContact {
            city: Some("   ".to_string()),
            ..CartContact::default()
        };

        let double_dot = CartContact {
            email: Some("ada@example..com".to_string()),
            ..CartContact::default()
        };

        assert_eq!(bad_email.validated(), Err(ContactError::InvalidEmail));
        assert_eq!(double_dot.validated(), Err(ContactError::InvalidEmail));
        assert_eq!(bad_phone.validated(), Err(ContactError::InvalidPhone));
        assert_eq!(blank_city.validated(), Err(ContactError::Blank("city")));
    }

    #[test]
    fn customer_identity_keys_on_customer() {
        let customer = CustomerUuid::from_uuid(Uuid::nil());
        let identity = CartIdentity::new(Some(customer), "10.0.0.1".parse().ok());

        assert_eq!(
            identity.key().as_deref(),
            Some("customer:00000000-0000-0000-0000-000000000000")
        );
    }

    #[test]
    fn anonymous_identity_keys_on_address() {
        let identity = CartIdentity::new(None, "2001:db8::1".parse().ok());

        assert_eq!(identity.key().as_deref(), Some("ip:2001:db8::1"));
        assert_eq!(identity.ip_address().as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn empty_identity_has_no_key() {
        assert_eq!(CartIdentity::new(None, None).key(), None);
    }
}
