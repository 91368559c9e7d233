//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    dispatch::{DispatchConfig, PaymentsConfig, StoreConfig},
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod dispatch;
pub(crate) mod observability;
pub(crate) mod server;

/// Pillbox JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "pillbox-json", about = "Pillbox JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request tracing and metrics settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Storefront settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Order event dispatcher settings.
    #[command(flatten)]
    pub dispatch: DispatchConfig,

    /// Payment link provider settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_fill_everything_but_the_database() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "pillbox-json",
            "--database-url",
            "postgres://localhost/pillbox",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.store.currency, "USD");
        assert_eq!(config.dispatch.dispatch_batch_size, 50);
        assert!(config.dispatch.dispatch_enabled, "dispatcher runs by default");
        assert_eq!(config.payments.payment_link_endpoint, None);

        Ok(())
    }

    #[test]
    fn payment_links_need_an_endpoint() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "pillbox-json",
            "--database-url",
            "postgres://localhost/pillbox",
            "--payment-link-endpoint",
            "https://payments.example.com/links",
            "--payment-link-api-key",
            "secret",
        ])?;

        let link_config = config.payments.link_config();

        assert_eq!(
            link_config.as_ref().map(|link| link.endpoint.as_str()),
            Some("https://payments.example.com/links")
        );
        assert_eq!(
            link_config.map(|link| link.api_key),
            Some("secret".to_string())
        );

        Ok(())
    }
}
