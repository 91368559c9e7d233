//! Carts
//!
//! Carts belong to the authenticated customer when a bearer token is sent, otherwise to the
//! client address.

use pillbox_app::domain::carts::models::CartIdentity;
use salvo::prelude::{Depot, Request};

use crate::extensions::*;

pub(crate) mod contact;
pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod items;
pub(crate) mod promo_code;
pub(crate) mod responses;

pub(crate) use handlers::*;

/// Who the request's cart belongs to.
pub(crate) fn cart_identity(req: &Request, depot: &Depot) -> CartIdentity {
    CartIdentity::new(depot.customer_uuid(), req.client_ip())
}
