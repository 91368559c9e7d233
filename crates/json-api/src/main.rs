//! Pillbox JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};
use tokio::sync::watch;
use tracing::{error, info};

use pillbox_app::{
    context::AppContext,
    dispatch::{HttpPaymentLinkProvider, LogNotifier, OrderEventDispatcher},
};

use crate::{
    config::ServerConfig,
    observability::{DispatchMetrics, metrics_handler, request_logging},
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod auth;
mod carts;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod orders;
mod products;
mod promo_codes;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod totals;

/// Pillbox JSON API Server entry point
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init_subscriber(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    observability::apply_runtime_config(&config);

    let Some(currency) = rusty_money::iso::find(&config.store.currency) else {
        error!(currency = %config.store.currency, "unknown store currency");

        process::exit(1);
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let app =
        match AppContext::from_database_url(&config.database.database_url, config.database.migrate)
            .await
        {
            Ok(app) => app,
            Err(init_error) => {
                error!("failed to initialize app context: {init_error}");

                process::exit(1);
            }
        };

    let (stopping_tx, stopping_rx) = watch::channel(false);

    let dispatcher = config.dispatch.dispatch_enabled.then(|| {
        let mut dispatcher = OrderEventDispatcher::new(
            app.db.clone(),
            Arc::new(LogNotifier),
            currency,
            Arc::clone(&app.order_events),
        )
        .with_settings(config.dispatch.settings())
        .with_observer(Arc::new(DispatchMetrics));

        if let Some(link_config) = config.payments.link_config() {
            dispatcher =
                dispatcher.with_payments(Arc::new(HttpPaymentLinkProvider::new(link_config)));
        }

        dispatcher.spawn(shutdown::stopped(stopping_rx))
    });

    let mut router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(request_logging)
        .hoop(inject(State::from_app_context(&app)))
        .push(router::app_router());

    if config.observability.metrics_enabled {
        router = router.push(Router::with_path("metrics").get(metrics_handler));
    }

    let doc = OpenApi::new("Pillbox API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle, stopping_tx).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    let dispatched = match dispatcher {
        Some(task) => task.await,
        None => Ok(()),
    };

    if let Err(join_error) = dispatched {
        error!("order event dispatcher task failed: {join_error}");
    }

    info!("server stopped");
}
