//! Request, target, and outcome types shared by the dispatcher and the HTTP layer.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use crate::error::{ExecError, ExecResult};

const FUNCTION_EXEC_PROTOCOL: &str = "ExecProtocol";
const FUNCTION_EXEC_REMOTE_FILE: &str = "ExecRemoteFile";

/// Action named by the `_function` request field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionName {
    /// Run the target as a literal command line.
    ExecProtocol,
    /// Download the target URI, then run the downloaded file.
    ExecRemoteFile,
    /// Anything else, including an absent value.
    Unknown(String),
}

impl FunctionName {
    /// Parse a raw `_function` value. Matching is exact and case-sensitive.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            FUNCTION_EXEC_PROTOCOL => Self::ExecProtocol,
            FUNCTION_EXEC_REMOTE_FILE => Self::ExecRemoteFile,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Wire name of a recognised function; `None` for [`Self::Unknown`].
    #[must_use]
    pub const fn known_name(&self) -> Option<&'static str> {
        match self {
            Self::ExecProtocol => Some(FUNCTION_EXEC_PROTOCOL),
            Self::ExecRemoteFile => Some(FUNCTION_EXEC_REMOTE_FILE),
            Self::Unknown(_) => None,
        }
    }

    /// Wire name of the function.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ExecProtocol => FUNCTION_EXEC_PROTOCOL,
            Self::ExecRemoteFile => FUNCTION_EXEC_REMOTE_FILE,
            Self::Unknown(value) => value,
        }
    }
}

impl Display for FunctionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A parsed inbound request: what to do and what to do it to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// URI or raw command line.
    pub target: String,
    /// Requested action.
    pub function: FunctionName,
}

impl ActionRequest {
    /// Build a request from raw field values.
    #[must_use]
    pub fn new(target: impl Into<String>, function: &str) -> Self {
        Self {
            target: target.into(),
            function: FunctionName::parse(function),
        }
    }
}

/// Where a remote file comes from and where it lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    /// Remote URI.
    pub source: String,
    /// Local file path under the base directory.
    pub destination: PathBuf,
}

impl DownloadTarget {
    /// Derive the destination from the last path segment of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::InvalidTarget`] when `source` has no `/`.
    pub fn derive(source: &str, base_dir: &Path) -> ExecResult<Self> {
        let Some(index) = source.rfind('/') else {
            return Err(ExecError::InvalidTarget {
                url: source.to_string(),
            });
        };
        let file_name = &source[index + 1..];
        Ok(Self {
            source: source.to_string(),
            destination: base_dir.join(file_name),
        })
    }
}

/// What a runner is asked to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchSpec {
    /// A literal command line handed to the platform shell.
    Command(String),
    /// A file on disk, typically a completed download.
    File(PathBuf),
}

impl Display for LaunchSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command(line) => formatter.write_str(line),
            Self::File(path) => write!(formatter, "{}", path.display()),
        }
    }
}

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// File written.
    pub destination: PathBuf,
    /// Bytes copied from the response body.
    pub bytes_written: u64,
}

/// What the caller is told about an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Whether the launch was initiated.
    pub succeeded: bool,
    /// Error message and source chain on failure.
    pub error_detail: Option<String>,
    /// Download details when a remote file was fetched.
    pub fetched: Option<FetchReport>,
}

impl ExecutionOutcome {
    /// Successful initiation, with the download report when there was one.
    #[must_use]
    pub const fn success(fetched: Option<FetchReport>) -> Self {
        Self {
            succeeded: true,
            error_detail: None,
            fetched,
        }
    }

    /// Failure carrying the rendered error chain.
    #[must_use]
    pub fn failure(error: &ExecError) -> Self {
        Self {
            succeeded: false,
            error_detail: Some(error.detail()),
            fetched: None,
        }
    }
}

impl From<ExecResult<Option<FetchReport>>> for ExecutionOutcome {
    fn from(result: ExecResult<Option<FetchReport>>) -> Self {
        match result {
            Ok(fetched) => Self::success(fetched),
            Err(err) => Self::failure(&err),
        }
    }
}
