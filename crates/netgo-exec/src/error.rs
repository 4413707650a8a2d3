//! # Design
//!
//! - Structured, constant-message errors for the execution pipeline.
//! - Capture context (paths, urls, commands) as fields instead of interpolating it.
//! - Preserve source errors so the response detail can render the full chain.

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for launch and fetch operations.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors produced while fetching or launching.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The source URI has no `/`, so no file name can be derived.
    #[error("invalid target")]
    InvalidTarget {
        /// Source URI supplied by the caller.
        url: String,
    },
    /// The HTTP client could not be constructed.
    #[error("http client unavailable")]
    HttpClient {
        /// Underlying client builder error.
        source: reqwest::Error,
    },
    /// The destination file could not be created.
    #[error("destination unwritable")]
    DestinationWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The remote request could not be completed.
    #[error("source unreachable")]
    SourceUnreachable {
        /// Source URI.
        url: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// Streaming the body to disk failed partway.
    #[error("copy failed")]
    CopyInterrupted {
        /// Destination path holding the partial download.
        path: PathBuf,
        /// Bytes written before the failure.
        bytes_written: u64,
        /// Underlying read or write error.
        source: io::Error,
    },
    /// The child process could not be started.
    #[error("process start failed")]
    ProcessStart {
        /// Command or path handed to the runner.
        command: String,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl ExecError {
    /// Render the message followed by each source in the chain.
    #[must_use]
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            detail.push_str(": ");
            detail.push_str(&err.to_string());
            source = err.source();
        }
        detail
    }
}

/// Errors raised before any action is attempted.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The `_function` value names no known action.
    #[error("unrecognized function")]
    UnrecognizedFunction {
        /// Value received from the caller.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_constant() {
        let invalid = ExecError::InvalidTarget {
            url: "no-slash".to_string(),
        };
        assert_eq!(invalid.to_string(), "invalid target");
        assert!(invalid.source().is_none());

        let dispatch = DispatchError::UnrecognizedFunction {
            value: "Nope".to_string(),
        };
        assert_eq!(dispatch.to_string(), "unrecognized function");
    }

    #[test]
    fn detail_includes_source_chain() {
        let err = ExecError::DestinationWrite {
            path: PathBuf::from("/missing/app.bin"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };
        assert_eq!(err.detail(), "destination unwritable: no such directory");

        let start = ExecError::ProcessStart {
            command: "missing-binary".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(start.source().is_some());
        assert_eq!(start.detail(), "process start failed: denied");
    }

    #[test]
    fn detail_without_source_is_message() {
        let err = ExecError::InvalidTarget {
            url: "plain".to_string(),
        };
        assert_eq!(err.detail(), "invalid target");
    }
}
