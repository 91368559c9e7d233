//! Cart Contact Body

use pillbox_app::domain::carts::models::CartContact;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Contact details collected before checkout. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CartContactBody {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zip_code: Option<String>,
}

impl From<CartContactBody> for CartContact {
    fn from(body: CartContactBody) -> Self {
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

impl From<CartContact> for CartContactBody {
    fn from(contact: CartContact) -> Self {
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
