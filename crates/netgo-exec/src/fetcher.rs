//! Remote file retrieval.
//!
//! The destination file is created before the request is sent, and the body is
//! streamed to it chunk by chunk. A failure after creation leaves whatever was
//! written on disk.

use std::io;

use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{ExecError, ExecResult};
use crate::launcher::Runner;
use crate::model::{DownloadTarget, FetchReport, LaunchSpec};

/// Downloads remote files to local paths.
#[derive(Debug, Clone)]
pub struct RemoteFetcher {
    client: Client,
}

impl RemoteFetcher {
    /// Build a fetcher with a default HTTP client. No request timeout is set.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::HttpClient`] if the client cannot be constructed.
    pub fn new() -> ExecResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ExecError::HttpClient { source })?;
        Ok(Self { client })
    }

    /// Download `target.source` into `target.destination`.
    ///
    /// # Errors
    ///
    /// - [`ExecError::DestinationWrite`] if the file cannot be created.
    /// - [`ExecError::SourceUnreachable`] if the request cannot be completed.
    /// - [`ExecError::CopyInterrupted`] if reading the body or writing the file fails.
    pub async fn fetch(&self, target: &DownloadTarget) -> ExecResult<FetchReport> {
        debug!(
            source = %target.source,
            destination = %target.destination.display(),
            "fetching remote file"
        );

        let mut file = File::create(&target.destination).await.map_err(|source| {
            ExecError::DestinationWrite {
                path: target.destination.clone(),
                source,
            }
        })?;

        let mut response = self
            .client
            .get(&target.source)
            .send()
            .await
            .map_err(|source| ExecError::SourceUnreachable {
                url: target.source.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                source = %target.source,
                status = status.as_u16(),
                "remote source answered with a non-success status; saving body as-is"
            );
        }

        let mut bytes_written: u64 = 0;
        loop {
            let chunk = response
                .chunk()
                .await
                .map_err(|err| ExecError::CopyInterrupted {
                    path: target.destination.clone(),
                    bytes_written,
                    source: io::Error::other(err),
                })?;
            let Some(chunk) = chunk else {
                break;
            };
            file.write_all(&chunk)
                .await
                .map_err(|source| ExecError::CopyInterrupted {
                    path: target.destination.clone(),
                    bytes_written,
                    source,
                })?;
            bytes_written =
                bytes_written.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        }

        file.flush()
            .await
            .map_err(|source| ExecError::CopyInterrupted {
                path: target.destination.clone(),
                bytes_written,
                source,
            })?;

        info!(
            source = %target.source,
            destination = %target.destination.display(),
            bytes = bytes_written,
            "remote file saved"
        );
        Ok(FetchReport {
            destination: target.destination.clone(),
            bytes_written,
        })
    }

    /// Download the target, then hand the saved file to `runner`.
    ///
    /// The launch is attempted only after the file is fully written and flushed.
    ///
    /// # Errors
    ///
    /// Returns the first failure from [`Self::fetch`] or from the runner.
    pub async fn fetch_and_launch(
        &self,
        target: &DownloadTarget,
        runner: &dyn Runner,
    ) -> ExecResult<FetchReport> {
        let report = self.fetch(target).await?;
        runner.launch(&LaunchSpec::File(report.destination.clone()))?;
        Ok(report)
    }
}
