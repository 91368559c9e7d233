//! Promo Code Handlers

pub(crate) mod get;
