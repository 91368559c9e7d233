//! Order confirmations.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tracing::info;

use crate::{dispatch::payments::PaymentLink, domain::orders::models::Order};

/// Errors that can occur when sending a confirmation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// The order has nowhere to send the confirmation to.
    #[error("order has no contact email")]
    MissingRecipient,

    /// The delivery channel could not be reached or refused the message.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Tells customers about their orders.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send the confirmation for a newly placed order, with its payment link if one was issued.
    ///
    /// # Errors
    ///
    /// Returns an error if the confirmation could not be delivered. The event is retried later.
    async fn send_order_confirmation(
        &self,
        order: &Order,
        payment_link: Option<PaymentLink>,
    ) -> Result<(), NotificationError>;
}

/// Writes confirmations to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_order_confirmation(
        &self,
        order: &Order,
        payment_link: Option<PaymentLink>,
    ) -> Result<(), NotificationError> {
        if order.contact.email.trim().is_empty() {
            return Err(NotificationError::MissingRecipient);
        }

        info!(
            order_uuid = %order.uuid,
            email = %order.contact.email,
            grand_total = %order.totals.grand_total,
            items = order.items.len(),
            payment_url = payment_link.as_ref().map(|link| link.url.as_str()),
            "order confirmation"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use pillbox::totals::Totals;
    use testresult::TestResult;

    use crate::domain::{
        customers::models::CustomerUuid,
        orders::models::{ContactDetails, OrderStatus, OrderUuid, PaymentStatus},
    };

    use super::*;

    fn order(email: &str) -> Order {
        Order {
            uuid: OrderUuid::new(),
            customer: CustomerUuid::new(),
            contact: ContactDetails {
                name: "Jane Doe".to_string(),
                email: email.to_string(),
                phone: "5551234567".to_string(),
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                country: "US".to_string(),
                zip_code: "62701".to_string(),
            },
            items: Vec::new(),
            promo_code: None,
            totals: Totals::ZERO,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_detail: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[tokio::test]
    async fn log_notifier_accepts_orders_with_an_email() -> TestResult {
        LogNotifier
            .send_order_confirmation(&order("jane@example.com"), None)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn log_notifier_needs_a_recipient() {
        let result = LogNotifier.send_order_confirmation(&order("  "), None).await;

        assert_eq!(result, Err(NotificationError::MissingRecipient));
    }
}
