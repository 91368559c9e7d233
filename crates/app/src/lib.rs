//! Pillbox application services: catalog, promo codes, carts, orders and customers over
//! PostgreSQL, plus the order event dispatcher.

pub mod auth;
pub mod context;
pub mod database;
pub mod dispatch;
pub mod domain;

#[cfg(test)]
mod test;

pub mod uuids;
