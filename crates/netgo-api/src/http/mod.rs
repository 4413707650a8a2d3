//! HTTP surface modules (router, handlers, middleware).

/// Shared constants and header values.
pub(crate) mod constants;
/// Action dispatch handler.
pub(crate) mod dispatch;
/// Prometheus exposition endpoint.
pub(crate) mod metrics;
/// XML reply bodies.
pub(crate) mod responses;
/// Router construction and server host.
pub mod router;
/// Shutdown endpoint and its trigger middleware.
pub(crate) mod shutdown;
/// Metrics middleware for HTTP requests.
pub(crate) mod telemetry;
