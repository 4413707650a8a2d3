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

//! Action execution pipeline for netgo.
//!
//! Layout: `model.rs` (request and outcome types), `launcher.rs` (process
//! runners), `fetcher.rs` (remote download), `dispatch.rs` (routing),
//! `error.rs` (error types).

/// Action routing from parsed requests to side effects.
pub mod dispatch;
/// Error types for the execution pipeline.
pub mod error;
/// Remote file retrieval.
pub mod fetcher;
/// Detached process runners.
pub mod launcher;
/// Request, target, and outcome types.
pub mod model;

pub use dispatch::Dispatcher;
pub use error::{DispatchError, ExecError, ExecResult};
pub use fetcher::RemoteFetcher;
pub use launcher::{RecordingRunner, Runner, ShellRunner};
pub use model::{
    ActionRequest, DownloadTarget, ExecutionOutcome, FetchReport, FunctionName, LaunchSpec,
};
