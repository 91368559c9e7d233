//! Post-commit side effects of placed orders.
//!
//! Orders write an `order.created` row to the `order_events` outbox in the same transaction as
//! the order itself. The [`OrderEventDispatcher`] claims those rows afterwards, requests a
//! payment link, sends the confirmation and marks the event processed.

mod dispatcher;
pub mod errors;
pub mod models;
pub mod notifier;
pub mod payments;
mod repository;

pub use dispatcher::*;
pub use errors::DispatchError;
pub use notifier::{LogNotifier, NotificationError, Notifier};
pub use payments::{HttpPaymentLinkProvider, PaymentLink, PaymentLinkError, PaymentLinkProvider};
