//! Cart Promo Code

pub(crate) mod handlers;

pub(crate) use handlers::*;
