//! Prometheus metrics exposed at `/metrics`.
//!
//! All series live under the `one_drink_today_` prefix:
//! - `http_requests_total{method,path,status}`
//! - `http_request_duration_seconds{method,path}`
//! - `notifications_created_total{kind}`
//! - `db_pool_connections{state}` refreshed on every scrape

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "one_drink_today";

const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_latency: HistogramVec,
    notifications: IntCounterVec,
    db_pool: GaugeVec,
}

impl Metrics {
    fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some(NAMESPACE.into()), None)?;

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "HTTP requests served"),
            &["method", "path", "status"],
        )?;
        let http_latency = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request latency")
                .buckets(LATENCY_BUCKETS.to_vec()),
            &["method", "path"],
        )?;
        let notifications = IntCounterVec::new(
            Opts::new("notifications_created_total", "Notifications persisted"),
            &["kind"],
        )?;
        let db_pool = GaugeVec::new(
            Opts::new("db_pool_connections", "PostgreSQL pool connections"),
            &["state"],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_latency.clone()))?;
        registry.register(Box::new(notifications.clone()))?;
        registry.register(Box::new(db_pool.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_latency,
            notifications,
            db_pool,
        })
    }
}

/// `None` only if registration failed, in which case recording is a no-op.
static METRICS: Lazy<Option<Metrics>> = Lazy::new(|| match Metrics::new() {
    Ok(metrics) => Some(metrics),
    Err(e) => {
        tracing::error!(error = %e, "Metrics registry unavailable");
        None
    }
});

/// Text exposition of every registered series
pub fn gather_metrics() -> String {
    let Some(metrics) = METRICS.as_ref() else {
        return String::new();
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// `path` should be the matched route template, not the raw URI
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    if let Some(metrics) = METRICS.as_ref() {
        let status = status.to_string();
        metrics
            .http_requests
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        metrics
            .http_latency
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }
}

pub fn record_notification(kind: &str) {
    if let Some(metrics) = METRICS.as_ref() {
        metrics.notifications.with_label_values(&[kind]).inc();
    }
}

pub fn update_db_pool_stats(idle: u32, active: u32, max: u32) {
    if let Some(metrics) = METRICS.as_ref() {
        for (state, value) in [("idle", idle), ("active", active), ("max", max)] {
            metrics
                .db_pool
                .with_label_values(&[state])
                .set(f64::from(value));
        }
    }
}
