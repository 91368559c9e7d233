//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use pillbox_app::dispatch::{DispatchObserver, models::OrderEventKind};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_placed_total: IntCounterVec,
    order_events_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a placed order. `source` is `order` for explicit lines and `checkout` for carts.
pub(crate) fn record_order_placed(source: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .orders_placed_total
            .with_label_values(&[source])
            .inc();
    }
}

fn record_order_event(kind: OrderEventKind, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .order_events_total
            .with_label_values(&[kind.as_str(), outcome])
            .inc();
    }
}

/// Feeds dispatcher outcomes into the order event counter.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DispatchMetrics;

impl DispatchObserver for DispatchMetrics {
    fn event_processed(&self, kind: OrderEventKind) {
        record_order_event(kind, "processed");
    }

    fn event_failed(&self, kind: OrderEventKind, exhausted: bool) {
        record_order_event(kind, if exhausted { "exhausted" } else { "failed" });
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static Metrics> {
    METRICS.get_or_init(build_metrics).as_ref()
}

fn register<C>(registry: &Registry, name: &str, metric: prometheus::Result<C>) -> Option<C>
where
    C: Collector + Clone + 'static,
{
    let metric = match metric {
        Ok(metric) => metric,
        Err(source) => {
            error!("failed to create {name} metric: {source}");
            return None;
        }
    };

    if let Err(source) = registry.register(Box::new(metric.clone())) {
        error!("failed to register {name} metric: {source}");
        return None;
    }

    Some(metric)
}

fn build_metrics() -> Option<Metrics> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        "requests_total",
        IntCounterVec::new(
            Opts::new(
                "pillbox_json_http_requests_total",
                "Total HTTP requests partitioned by method, route, status class, and status code.",
            ),
            &["method", "route", "status_class", "status_code"],
        ),
    )?;

    let request_duration_seconds = register(
        &registry,
        "request_duration",
        HistogramVec::new(
            HistogramOpts::new(
                "pillbox_json_http_request_duration_seconds",
                "HTTP request duration in seconds partitioned by method and route.",
            )
            .buckets(vec![
                0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ]),
            &["method", "route"],
        ),
    )?;

    let requests_in_flight = register(
        &registry,
        "in-flight gauge",
        IntGauge::with_opts(Opts::new(
            "pillbox_json_http_requests_in_flight",
            "Current number of in-flight HTTP requests.",
        )),
    )?;

    let orders_placed_total = register(
        &registry,
        "orders_placed_total",
        IntCounterVec::new(
            Opts::new(
                "pillbox_orders_placed_total",
                "Orders placed, partitioned by whether they came from explicit lines or a cart.",
            ),
            &["source"],
        ),
    )?;

    let order_events_total = register(
        &registry,
        "order_events_total",
        IntCounterVec::new(
            Opts::new(
                "pillbox_order_events_total",
                "Order events handled by the dispatcher, partitioned by kind and outcome.",
            ),
            &["kind", "outcome"],
        ),
    )?;

    Some(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_placed_total,
        order_events_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
