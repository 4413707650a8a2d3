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

//! netgo application bootstrap wiring.
//!
//! Layout: `config.rs` (flags and environment), `bootstrap.rs` (service
//! wiring and signal handling), `error.rs` (application errors).

/// Application bootstrap and signal handling.
pub mod bootstrap;
/// Command-line and environment configuration.
pub mod config;
/// Application-level error types.
pub mod error;

pub use bootstrap::run_app;
pub use config::{AppConfig, Cli};
pub use error::{AppError, AppResult};
