#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Telemetry primitives shared across the netgo workspace.
//!
//! Layout: `init.rs` (subscriber installation), `context.rs` (application span),
//! `metrics.rs` (Prometheus registry), `layers.rs` (request id middleware),
//! `error.rs` (error type).

/// Application-level span guard.
pub mod context;
/// Error types for telemetry operations.
pub mod error;
/// Logging initialisation and configuration.
pub mod init;
/// Request id layers for tower stacks.
pub mod layers;
/// Prometheus metrics registry.
pub mod metrics;

pub use context::GlobalContextGuard;
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use layers::{propagate_request_id_layer, set_request_id_layer};
pub use metrics::{Metrics, MetricsSnapshot};
