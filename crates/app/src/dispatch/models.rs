//! Order Event Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;

use crate::{
    domain::orders::models::{OrderUuid, UnknownStatus},
    uuids::TypedUuid,
};

/// Order Event UUID
pub type OrderEventUuid = TypedUuid<OrderEvent>;

/// What happened to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderEventKind {
    /// The order was placed and needs its payment link and confirmation.
    OrderCreated,
}

impl OrderEventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OrderCreated => "order.created",
        }
    }
}

impl fmt::Display for OrderEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderEventKind {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "order.created" => Ok(Self::OrderCreated),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A claimed outbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEvent {
    pub uuid: OrderEventUuid,
    pub order: OrderUuid,
    pub kind: OrderEventKind,
    pub attempts: i32,
    pub created_at: Timestamp,
}
