//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the counters relevant to action dispatch and shutdown.

use std::sync::Arc;

use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::error::{Result, TelemetryError};

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    actions_total: IntCounterVec,
    downloaded_bytes_total: IntCounter,
    shutdown_requests_total: IntCounter,
}

/// Snapshot of the scalar counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total bytes written to disk by remote fetches.
    pub downloaded_bytes_total: u64,
    /// Total calls to the shutdown endpoint.
    pub shutdown_requests_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "http_requests_total",
            source,
        })?;
        let actions_total = IntCounterVec::new(
            Opts::new("actions_total", "Dispatched actions by function and outcome"),
            &["function", "outcome"],
        )
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "actions_total",
            source,
        })?;
        let downloaded_bytes_total = IntCounter::with_opts(Opts::new(
            "downloaded_bytes_total",
            "Bytes written to disk by remote fetches",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "downloaded_bytes_total",
            source,
        })?;
        let shutdown_requests_total = IntCounter::with_opts(Opts::new(
            "shutdown_requests_total",
            "Calls to the shutdown endpoint",
        ))
        .map_err(|source| TelemetryError::MetricsCollector {
            name: "shutdown_requests_total",
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "actions_total", &actions_total)?;
        register(&registry, "downloaded_bytes_total", &downloaded_bytes_total)?;
        register(&registry, "shutdown_requests_total", &shutdown_requests_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                actions_total,
                downloaded_bytes_total,
                shutdown_requests_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        let code = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[route, code.as_str()])
            .inc();
    }

    /// Increment the action counter for a function name and outcome label.
    pub fn inc_action(&self, function: &str, outcome: &str) {
        self.inner
            .actions_total
            .with_label_values(&[function, outcome])
            .inc();
    }

    /// Add to the downloaded byte counter.
    pub fn add_downloaded_bytes(&self, bytes: u64) {
        self.inner.downloaded_bytes_total.inc_by(bytes);
    }

    /// Increment the shutdown request counter.
    pub fn inc_shutdown_request(&self) {
        self.inner.shutdown_requests_total.inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::MetricsEncode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::MetricsUtf8 { source })
    }

    /// Count of actions recorded for a function and outcome.
    #[must_use]
    pub fn action_count(&self, function: &str, outcome: &str) -> u64 {
        self.inner
            .actions_total
            .with_label_values(&[function, outcome])
            .get()
    }

    /// Take a point-in-time snapshot of the scalar counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            downloaded_bytes_total: self.inner.downloaded_bytes_total.get(),
            shutdown_requests_total: self.inner.shutdown_requests_total.get(),
        }
    }
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::MetricsRegister { name, source })
}
