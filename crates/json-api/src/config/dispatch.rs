//! Store, Dispatch & Payments Config

use std::time::Duration;

use clap::Args;
use pillbox_app::dispatch::{DispatchSettings, payments::PaymentLinkConfig};

/// Storefront settings.
#[derive(Debug, Args)]
pub struct StoreConfig {
    /// ISO 4217 code prices are charged in
    #[arg(long, env = "STORE_CURRENCY", default_value = "USD")]
    pub currency: String,
}

/// Order event dispatcher settings.
#[derive(Debug, Args)]
pub struct DispatchConfig {
    /// Run the order event dispatcher inside the server process.
    #[arg(
        long,
        env = "DISPATCH_ENABLED",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub dispatch_enabled: bool,

    /// Seconds between outbox polls.
    #[arg(long, env = "DISPATCH_POLL_INTERVAL_SECS", default_value_t = 30_u64)]
    pub dispatch_poll_interval_secs: u64,

    /// Events handled per pass.
    #[arg(long, env = "DISPATCH_BATCH_SIZE", default_value_t = 50_u32)]
    pub dispatch_batch_size: u32,

    /// Attempts before an event is given up on.
    #[arg(long, env = "DISPATCH_MAX_ATTEMPTS", default_value_t = 5_i32)]
    pub dispatch_max_attempts: i32,
}

impl DispatchConfig {
    #[must_use]
    pub fn settings(&self) -> DispatchSettings {
        DispatchSettings {
            poll_interval: Duration::from_secs(self.dispatch_poll_interval_secs),
            batch_size: self.dispatch_batch_size,
            max_attempts: self.dispatch_max_attempts,
        }
    }
}

/// Payment link provider settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Endpoint that issues payment links. Links are skipped when unset.
    #[arg(long, env = "PAYMENT_LINK_ENDPOINT")]
    pub payment_link_endpoint: Option<String>,

    /// Bearer token for the payment link endpoint.
    #[arg(
        long,
        env = "PAYMENT_LINK_API_KEY",
        hide_env_values = true,
        default_value = ""
    )]
    pub payment_link_api_key: String,
}

impl PaymentsConfig {
    /// Provider settings, when an endpoint is configured.
    #[must_use]
    pub fn link_config(&self) -> Option<PaymentLinkConfig> {
        self.payment_link_endpoint
            .as_ref()
            .map(|endpoint| PaymentLinkConfig {
                endpoint: endpoint.clone(),
                api_key: self.payment_link_api_key.clone(),
            })
    }
}
