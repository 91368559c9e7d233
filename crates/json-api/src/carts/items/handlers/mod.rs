//! Cart Item Handlers

pub(crate) mod delete;
