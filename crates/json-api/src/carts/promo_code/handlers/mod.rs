//! Cart Promo Code Handlers

pub(crate) mod delete;
pub(crate) mod update;
