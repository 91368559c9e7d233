//! Orders
//!
//! Orders are always placed by an authenticated customer. Their prices are frozen when placed.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod requests;
pub(crate) mod responses;

pub(crate) use handlers::*;
