//! Products
//!
//! Read-only catalog views. Catalog changes are made with the `pillbox-app catalog` commands.

pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod responses;

pub(crate) use handlers::*;
