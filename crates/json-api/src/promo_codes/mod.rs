//! Promo Codes
//!
//! Lets shoppers check a code before applying it to their cart.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod responses;

pub(crate) use handlers::*;
