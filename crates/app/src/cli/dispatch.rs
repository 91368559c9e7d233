use std::{sync::Arc, time::Duration};

use clap::Args;
use pillbox_app::{
    database::Db,
    dispatch::{
        DispatchSettings, HttpPaymentLinkProvider, LogNotifier, OrderEventDispatcher,
        payments::PaymentLinkConfig,
    },
};
use tokio::sync::Notify;

#[derive(Debug, Args)]
pub(crate) struct DispatchArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// ISO 4217 code payment links are issued in
    #[arg(long, env = "STORE_CURRENCY", default_value = "USD")]
    currency: String,

    /// Endpoint that issues payment links; links are skipped when unset
    #[arg(long, env = "PAYMENT_LINK_ENDPOINT")]
    payment_link_endpoint: Option<String>,

    /// Bearer token for the payment link endpoint
    #[arg(long, env = "PAYMENT_LINK_API_KEY", hide_env_values = true, default_value = "")]
    payment_link_api_key: String,

    /// Seconds between outbox polls
    #[arg(long, env = "DISPATCH_POLL_INTERVAL_SECS", default_value_t = 30)]
    poll_interval_secs: u64,

    /// Events handled per pass
    #[arg(long, env = "DISPATCH_BATCH_SIZE", default_value_t = 50)]
    batch_size: u32,

    /// Attempts before an event is given up on
    #[arg(long, env = "DISPATCH_MAX_ATTEMPTS", default_value_t = 5)]
    max_attempts: i32,

    /// Handle pending events once and exit
    #[arg(long)]
    once: bool,
}

pub(crate) async fn run(args: DispatchArgs) -> Result<(), String> {
    let currency = rusty_money::iso::find(&args.currency)
        .ok_or_else(|| format!("unknown currency {}", args.currency))?;

    let pool = super::connect(&args.database_url).await?;

    let mut dispatcher = OrderEventDispatcher::new(
        Db::new(pool),
        Arc::new(LogNotifier),
        currency,
        Arc::new(Notify::new()),
    )
    .with_settings(DispatchSettings {
        poll_interval: Duration::from_secs(args.poll_interval_secs),
        batch_size: args.batch_size,
        max_attempts: args.max_attempts,
    });

    if let Some(endpoint) = args.payment_link_endpoint {
        dispatcher = dispatcher.with_payments(Arc::new(HttpPaymentLinkProvider::new(
            PaymentLinkConfig {
                endpoint,
                api_key: args.payment_link_api_key,
            },
        )));
    }

    if args.once {
        let report = dispatcher
            .dispatch_pending()
            .await
            .map_err(|error| format!("failed to dispatch order events: {error}"))?;

        println!("processed: {}", report.processed);
        println!("failed: {}", report.failed);

        return Ok(());
    }

    dispatcher
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;

    Ok(())
}
