//! Pillbox Domain Concerns

pub mod carts;
pub mod catalog;
pub mod customers;
pub mod orders;
pub mod promo_codes;
