//! Outbox dispatcher.

use std::{fmt, future::Future, pin::pin, sync::Arc, time::Duration};

use rusty_money::iso::Currency;
use serde_json::json;
use sqlx::{Postgres, Transaction};
use tokio::{
    sync::Notify,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, error, info, warn};

use crate::{
    database::Db,
    dispatch::{
        errors::DispatchError,
        models::{OrderEvent, OrderEventKind, OrderEventUuid},
        notifier::Notifier,
        payments::{PaymentLink, PaymentLinkProvider},
        repository::PgOrderEventsRepository,
    },
    domain::orders::{models::Order, repository::PgOrdersRepository},
};

/// Key the payment link is stored under in `orders.payment_detail`.
const PAYMENT_LINK_KEY: &str = "payment_link";

/// How often and how hard the dispatcher works.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Fallback wake-up for events whose notification was missed.
    pub poll_interval: Duration,

    /// Events handled per pass.
    pub batch_size: u32,

    /// Events that failed this many times are left alone.
    pub max_attempts: i32,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            batch_size: 50,
            max_attempts: 5,
        }
    }
}

/// Outcome of one pass over the outbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub processed: u32,
    pub failed: u32,
}

impl DispatchReport {
    #[must_use]
    pub const fn handled(&self) -> u32 {
        self.processed + self.failed
    }
}

/// Hooks for recording dispatch outcomes, e.g. as metrics.
pub trait DispatchObserver: Send + Sync {
    fn event_processed(&self, kind: OrderEventKind);

    /// `exhausted` is set once the event has used up its attempts.
    fn event_failed(&self, kind: OrderEventKind, exhausted: bool);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {
    fn event_processed(&self, _kind: OrderEventKind) {}

    fn event_failed(&self, _kind: OrderEventKind, _exhausted: bool) {}
}

/// Works through pending `order_events` rows.
pub struct OrderEventDispatcher {
    db: Db,
    notifier: Arc<dyn Notifier>,
    payments: Option<Arc<dyn PaymentLinkProvider>>,
    currency: &'static Currency,
    wake: Arc<Notify>,
    settings: DispatchSettings,
    observer: Arc<dyn DispatchObserver>,
    repository: PgOrderEventsRepository,
    orders_repository: PgOrdersRepository,
}

impl fmt::Debug for OrderEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderEventDispatcher")
            .field("currency", &self.currency.iso_alpha_code)
            .field("payments", &self.payments.is_some())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl OrderEventDispatcher {
    /// Payment links are only requested once a provider is set with [`Self::with_payments`].
    #[must_use]
    pub fn new(
        db: Db,
        notifier: Arc<dyn Notifier>,
        currency: &'static Currency,
        wake: Arc<Notify>,
    ) -> Self {
        Self {
            db,
            notifier,
            payments: None,
            currency,
            wake,
            settings: DispatchSettings::default(),
            observer: Arc::new(NoopObserver),
            repository: PgOrderEventsRepository::new(),
            orders_repository: PgOrdersRepository::new(),
        }
    }

    #[must_use]
    pub fn with_payments(mut self, payments: Arc<dyn PaymentLinkProvider>) -> Self {
        self.payments = Some(payments);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Handle up to `batch_size` pending events, each in its own transaction.
    ///
    /// Failures of collaborators are recorded on the event and counted in the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbox itself cannot be read or written.
    #[tracing::instrument(name = "dispatch.dispatch_pending", skip(self), err)]
    pub async fn dispatch_pending(&self) -> Result<DispatchReport, DispatchError> {
        let mut report = DispatchReport::default();
        let mut tried: Vec<OrderEventUuid> = Vec::new();

        while report.handled() < self.settings.batch_size {
            let mut tx = self.db.begin().await?;

            let Some(event) = self
                .repository
                .claim_order_event(&mut tx, self.settings.max_attempts, &tried)
                .await?
            else {
                break;
            };

            tried.push(event.uuid);

            match self.handle_event(&mut tx, &event).await {
                Ok(()) => {
                    self.repository.mark_processed(&mut tx, event.uuid).await?;
                    tx.commit().await?;

                    self.observer.event_processed(event.kind);
                    report.processed += 1;

                    debug!(event_uuid = %event.uuid, kind = %event.kind, "processed order event");
                }
                Err(failure) => {
                    // A failed statement aborts the transaction, so storage failures are
                    // recorded in a fresh one.
                    let mut tx = if matches!(failure, DispatchError::Sql(_)) {
                        tx.rollback().await?;
                        self.db.begin().await?
                    } else {
                        tx
                    };

                    let attempts = self
                        .repository
                        .record_failure(&mut tx, event.uuid, &failure.to_string())
                        .await?;

                    tx.commit().await?;

                    let exhausted = attempts >= self.settings.max_attempts;

                    self.observer.event_failed(event.kind, exhausted);
                    report.failed += 1;

                    warn!(
                        event_uuid = %event.uuid,
                        order_uuid = %event.order,
                        attempts,
                        exhausted,
                        error = %failure,
                        "order event failed"
                    );
                }
            }
        }

        Ok(report)
    }

    async fn handle_event(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: &OrderEvent,
    ) -> Result<(), DispatchError> {
        match event.kind {
            OrderEventKind::OrderCreated => self.order_created(tx, event).await,
        }
    }

    async fn order_created(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        event: &OrderEvent,
    ) -> Result<(), DispatchError> {
        let mut order = self
            .repository
            .get_order(tx, event.order)
            .await?
            .ok_or(DispatchError::OrderNotFound)?;

        order.items = self
            .orders_repository
            .get_order_items(tx, &[order.uuid])
            .await?;

        let payment_link = match stored_payment_link(&order) {
            Some(link) => Some(link),
            None => self.request_payment_link(tx, &order).await?,
        };

        self.notifier
            .send_order_confirmation(&order, payment_link)
            .await?;

        Ok(())
    }

    /// Ask the provider for a link and store it on the order so retries reuse it.
    async fn request_payment_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &Order,
    ) -> Result<Option<PaymentLink>, DispatchError> {
        let Some(payments) = &self.payments else {
            return Ok(None);
        };

        let amount = order.totals.grand_total_money(self.currency)?;
        let link = payments.create_payment_link(order.uuid, amount).await?;

        let mut detail = match &order.payment_detail {
            Some(serde_json::Value::Object(existing)) => existing.clone(),
            _ => serde_json::Map::new(),
        };

        detail.insert(PAYMENT_LINK_KEY.to_string(), json!(link));

        self.repository
            .set_payment_detail(tx, order.uuid, serde_json::Value::Object(detail))
            .await?;

        info!(order_uuid = %order.uuid, payment_link_id = %link.id, "created payment link");

        Ok(Some(link))
    }

    /// Run until `shutdown` resolves, waking on new orders and every poll interval.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        let mut shutdown = pin!(shutdown);
        let mut ticker = interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            poll_interval = ?self.settings.poll_interval,
            batch_size = self.settings.batch_size,
            "order event dispatcher started"
        );

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                () = self.wake.notified() => {}
                _ = ticker.tick() => {}
            }

            match self.dispatch_pending().await {
                Ok(report) if report.handled() >= self.settings.batch_size => {
                    // More may be waiting.
                    self.wake.notify_one();
                }
                Ok(_) => {}
                Err(dispatch_error) => {
                    error!(error = %dispatch_error, "order event dispatch failed");
                }
            }
        }

        info!("order event dispatcher stopped");
    }

    /// Spawn [`Self::run`] on the current runtime.
    pub fn spawn<F>(self, shutdown: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(self.run(shutdown))
    }
}

fn stored_payment_link(order: &Order) -> Option<PaymentLink> {
    let detail = order.payment_detail.as_ref()?.get(PAYMENT_LINK_KEY)?;

    serde_json::from_value(detail.clone()).ok()
}
