//! Shared state handed to every handler.

use netgo_exec::Dispatcher;
use netgo_telemetry::Metrics;

use crate::shutdown::ShutdownSignal;

/// Process-wide handler state, built once at bootstrap and shared by `Arc`.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) telemetry: Metrics,
    pub(crate) shutdown: ShutdownSignal,
}

impl ApiState {
    /// Bundle the dispatcher, metrics registry, and shutdown signal.
    #[must_use]
    pub const fn new(dispatcher: Dispatcher, telemetry: Metrics, shutdown: ShutdownSignal) -> Self {
        Self {
            dispatcher,
            telemetry,
            shutdown,
        }
    }
}
