//! Pillbox
//!
//! Pillbox is the pricing engine behind the storefront: discount rules, line item pricing,
//! cart and order totals, and promo code validation. Everything in this crate is pure; the
//! catalog, carts and orders live in `pillbox-app`.

pub mod discounts;
pub mod prelude;
pub mod pricing;
pub mod promo_codes;
pub mod totals;
