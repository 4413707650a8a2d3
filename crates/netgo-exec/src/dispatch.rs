//! Routes parsed requests to the launcher or the fetcher.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DispatchError, ExecResult};
use crate::fetcher::RemoteFetcher;
use crate::launcher::Runner;
use crate::model::{
    ActionRequest, DownloadTarget, ExecutionOutcome, FetchReport, FunctionName, LaunchSpec,
};

/// Turns an [`ActionRequest`] into exactly one launch attempt.
#[derive(Clone)]
pub struct Dispatcher {
    runner: Arc<dyn Runner>,
    fetcher: RemoteFetcher,
    base_dir: PathBuf,
}

impl Dispatcher {
    /// Construct a dispatcher that saves downloads under `base_dir`.
    #[must_use]
    pub fn new(runner: Arc<dyn Runner>, fetcher: RemoteFetcher, base_dir: PathBuf) -> Self {
        Self {
            runner,
            fetcher,
            base_dir,
        }
    }

    /// Run the requested action.
    ///
    /// Execution failures are reported inside the returned outcome; identical
    /// requests are never merged, so repeating one repeats its side effects.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnrecognizedFunction`] without side effects when
    /// the function name is unknown.
    pub async fn dispatch(
        &self,
        request: &ActionRequest,
    ) -> Result<ExecutionOutcome, DispatchError> {
        let result = match &request.function {
            FunctionName::ExecProtocol => self.exec_protocol(&request.target).map(|()| None),
            FunctionName::ExecRemoteFile => {
                self.exec_remote_file(&request.target).await.map(Some)
            }
            FunctionName::Unknown(value) => {
                return Err(DispatchError::UnrecognizedFunction {
                    value: value.clone(),
                });
            }
        };
        Ok(ExecutionOutcome::from(result))
    }

    fn exec_protocol(&self, command: &str) -> ExecResult<()> {
        debug!(command, "launching command line");
        self.runner.launch(&LaunchSpec::Command(command.to_string()))
    }

    async fn exec_remote_file(&self, url: &str) -> ExecResult<FetchReport> {
        let target = DownloadTarget::derive(url, &self.base_dir)?;
        self.fetcher
            .fetch_and_launch(&target, self.runner.as_ref())
            .await
    }
}
