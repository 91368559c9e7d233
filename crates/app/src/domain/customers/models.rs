//! Customer Models

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Customer UUID
pub type CustomerUuid = TypedUuid<Customer>;

/// Customer Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Customer Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub uuid: CustomerUuid,
    pub name: String,
    pub email: String,
}
