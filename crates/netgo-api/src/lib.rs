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

//! HTTP surface for netgo.
//!
//! Layout: `state.rs` (shared handler state), `shutdown.rs` (one-shot stop
//! signal), `error.rs` (bind/serve errors), `http/` (router, handlers, and
//! middleware).

/// Error types for binding and serving.
pub mod error;
/// Router, handlers, and middleware.
pub mod http;
/// One-shot shutdown signal.
pub mod shutdown;
/// Shared handler state.
pub mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::router::ApiServer;
pub use shutdown::ShutdownSignal;
pub use state::ApiState;
