//! Payment link provider.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::orders::models::OrderUuid;

/// A hosted payment page for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLink {
    pub id: String,
    pub url: String,
}

/// Errors that can occur when requesting a payment link.
#[derive(Debug, Error)]
pub enum PaymentLinkError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider returned a non-2xx response.
    #[error("unexpected response from payment provider: {0}")]
    UnexpectedResponse(String),
}

/// Issues payment links for order totals.
#[automock]
#[async_trait]
pub trait PaymentLinkProvider: Send + Sync {
    /// Request a link charging `amount` for `order`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or refuses the request.
    async fn create_payment_link(
        &self,
        order: OrderUuid,
        amount: Money<'static, Currency>,
    ) -> Result<PaymentLink, PaymentLinkError>;
}

/// Configuration for an HTTP payment link endpoint.
#[derive(Debug, Clone)]
pub struct PaymentLinkConfig {
    /// Endpoint that accepts `POST` requests for new links.
    pub endpoint: String,

    /// Bearer token sent with every request.
    pub api_key: String,
}

/// Requests payment links from a JSON HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpPaymentLinkProvider {
    config: PaymentLinkConfig,
    http: Client,
}

impl HttpPaymentLinkProvider {
    #[must_use]
    pub fn new(config: PaymentLinkConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PaymentLinkRequest<'a> {
    reference: String,
    amount_minor: i64,
    currency: &'a str,
}

#[async_trait]
impl PaymentLinkProvider for HttpPaymentLinkProvider {
    #[tracing::instrument(
        name = "dispatch.payments.create_payment_link",
        skip(self, amount),
        fields(order_uuid = %order, amount = %amount),
        err
    )]
    async fn create_payment_link(
        &self,
        order: OrderUuid,
        amount: Money<'static, Currency>,
    ) -> Result<PaymentLink, PaymentLinkError> {
        let body = PaymentLinkRequest {
            reference: order.to_string(),
            amount_minor: amount.to_minor_units(),
            currency: amount.currency().iso_alpha_code,
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PaymentLinkError::UnexpectedResponse(format!(
                "payment link request failed with status {status}: {text}"
            )));
        }

        Ok(response.json().await?)
    }
}
