//! Depot helper extensions.

use std::any::Any;

use pillbox_app::domain::customers::models::CustomerUuid;
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the customer a bearer token resolved to.
    fn insert_customer_uuid(&mut self, customer: CustomerUuid);

    /// The authenticated customer, if the request carried a valid token.
    fn customer_uuid(&self) -> Option<CustomerUuid>;

    fn customer_uuid_or_401(&self) -> Result<CustomerUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_customer_uuid(&mut self, customer: CustomerUuid) {
        self.inject(customer);
    }

    fn customer_uuid(&self) -> Option<CustomerUuid> {
        self.obtain::<CustomerUuid>().ok().copied()
    }

    fn customer_uuid_or_401(&self) -> Result<CustomerUuid, StatusError> {
        self.customer_uuid()
            .ok_or_else(|| StatusError::unauthorized().brief("Authentication required"))
    }
}
