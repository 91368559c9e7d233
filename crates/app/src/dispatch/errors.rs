//! Dispatch errors.

use thiserror::Error;

use crate::dispatch::{notifier::NotificationError, payments::PaymentLinkError};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("order for event not found")]
    OrderNotFound,

    #[error("order total cannot be charged: {0}")]
    Amount(#[from] pillbox::totals::TotalsError),

    #[error("payment link request failed: {0}")]
    PaymentLink(#[from] PaymentLinkError),

    #[error("notification failed: {0}")]
    Notification(#[from] NotificationError),

    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
