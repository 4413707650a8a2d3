use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use httpmock::MockServer;
use httpmock::prelude::*;
use netgo_exec::{
    ActionRequest, Dispatcher, DownloadTarget, ExecError, ExecResult, LaunchSpec,
    RecordingRunner, RemoteFetcher, Runner,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const PAYLOAD: &[u8] = b"\x7fELF\x02\x01\x01netgo-payload\x00\xff\x10";

/// Captures the file contents visible at launch time.
#[derive(Default)]
struct InspectingRunner {
    seen: Mutex<Vec<(PathBuf, Vec<u8>)>>,
}

impl Runner for InspectingRunner {
    fn launch(&self, spec: &LaunchSpec) -> ExecResult<()> {
        let LaunchSpec::File(path) = spec else {
            return Err(ExecError::ProcessStart {
                command: spec.to_string(),
                source: io::Error::other("expected a file launch"),
            });
        };
        let contents = std::fs::read(path).map_err(|source| ExecError::ProcessStart {
            command: spec.to_string(),
            source,
        })?;
        self.seen
            .lock()
            .map_err(|_| ExecError::ProcessStart {
                command: spec.to_string(),
                source: io::Error::other("poisoned"),
            })?
            .push((path.clone(), contents));
        Ok(())
    }
}

#[tokio::test]
async fn remote_file_is_saved_then_launched() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/dist/app.bin");
        then.status(200).body(PAYLOAD);
    });
    let dir = tempfile::tempdir()?;
    let runner = Arc::new(InspectingRunner::default());
    let dispatcher = Dispatcher::new(
        runner.clone(),
        RemoteFetcher::new()?,
        dir.path().to_path_buf(),
    );

    let outcome = dispatcher
        .dispatch(&ActionRequest::new(
            server.url("/dist/app.bin"),
            "ExecRemoteFile",
        ))
        .await?;

    assert!(outcome.succeeded, "{:?}", outcome.error_detail);
    mock.assert();
    let expected = dir.path().join("app.bin");
    assert_eq!(std::fs::read(&expected)?, PAYLOAD);
    let report = outcome.fetched.ok_or_else(|| anyhow::anyhow!("missing report"))?;
    assert_eq!(report.destination, expected);
    assert_eq!(report.bytes_written, PAYLOAD.len() as u64);

    let seen = runner
        .seen
        .lock()
        .map_err(|_| anyhow::anyhow!("poisoned"))?
        .clone();
    assert_eq!(seen, vec![(expected, PAYLOAD.to_vec())]);
    Ok(())
}

#[tokio::test]
async fn repeated_requests_download_and_launch_twice() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/app.bin");
        then.status(200).body(PAYLOAD);
    });
    let dir = tempfile::tempdir()?;
    let runner = Arc::new(RecordingRunner::new());
    let dispatcher = Dispatcher::new(
        runner.clone(),
        RemoteFetcher::new()?,
        dir.path().to_path_buf(),
    );
    let request = ActionRequest::new(server.url("/app.bin"), "ExecRemoteFile");

    for _ in 0..2 {
        let outcome = dispatcher.dispatch(&request).await?;
        assert!(outcome.succeeded);
    }

    mock.assert_calls(2);
    let path = dir.path().join("app.bin");
    assert_eq!(
        runner.launches(),
        vec![LaunchSpec::File(path.clone()), LaunchSpec::File(path)]
    );
    Ok(())
}

#[tokio::test]
async fn unwritable_destination_skips_the_request() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/app.bin");
        then.status(200).body(PAYLOAD);
    });
    let dir = tempfile::tempdir()?;
    let missing_base = dir.path().join("does-not-exist");
    let target = DownloadTarget::derive(&server.url("/app.bin"), &missing_base)?;

    let result = RemoteFetcher::new()?.fetch(&target).await;

    assert!(matches!(result, Err(ExecError::DestinationWrite { .. })));
    mock.assert_calls(0);
    Ok(())
}

#[tokio::test]
async fn unreachable_source_leaves_created_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let target = DownloadTarget::derive(&format!("http://{addr}/app.bin"), dir.path())?;
    let runner = RecordingRunner::new();

    let result = RemoteFetcher::new()?
        .fetch_and_launch(&target, &runner)
        .await;

    let Err(err) = result else {
        anyhow::bail!("expected fetch to fail");
    };
    assert!(matches!(err, ExecError::SourceUnreachable { .. }));
    assert!(err.detail().starts_with("source unreachable: "));
    assert!(target.destination.exists());
    assert!(runner.launches().is_empty());
    Ok(())
}

#[tokio::test]
async fn launch_failure_after_download_keeps_file() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/tool.exe");
        then.status(200).body(PAYLOAD);
    });
    let dir = tempfile::tempdir()?;
    let runner = Arc::new(RecordingRunner::failing(io::ErrorKind::PermissionDenied));
    let dispatcher = Dispatcher::new(runner, RemoteFetcher::new()?, dir.path().to_path_buf());

    let outcome = dispatcher
        .dispatch(&ActionRequest::new(server.url("/tool.exe"), "ExecRemoteFile"))
        .await?;

    assert!(!outcome.succeeded);
    assert!(
        outcome
            .error_detail
            .as_deref()
            .is_some_and(|detail| detail.starts_with("process start failed"))
    );
    assert_eq!(std::fs::read(dir.path().join("tool.exe"))?, PAYLOAD);
    Ok(())
}

#[tokio::test]
async fn non_success_status_body_is_saved() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/gone.bin");
        then.status(404).body("missing");
    });
    let dir = tempfile::tempdir()?;
    let target = DownloadTarget::derive(&server.url("/gone.bin"), dir.path())?;

    let report = RemoteFetcher::new()?.fetch(&target).await?;

    assert_eq!(report.bytes_written, 7);
    assert_eq!(std::fs::read_to_string(&target.destination)?, "missing");
    Ok(())
}

/// Serve one response that promises 100 bytes, send 10, then hang up.
async fn truncated_source() -> Result<(String, tokio::task::JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|window| window == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(read) => request.extend_from_slice(&buf[..read]),
            }
        }
        let head = "HTTP/1.1 200 OK\r\ncontent-length: 100\r\nconnection: close\r\n\r\n";
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(b"0123456789").await;
        let _ = socket.flush().await;
    });
    Ok((format!("http://{addr}/partial.bin"), handle))
}

#[tokio::test]
async fn truncated_body_keeps_partial_file_and_skips_launch() -> Result<()> {
    let (url, source) = truncated_source().await?;
    let dir = tempfile::tempdir()?;
    let target = DownloadTarget::derive(&url, dir.path())?;
    let runner = RecordingRunner::new();

    let result = RemoteFetcher::new()?
        .fetch_and_launch(&target, &runner)
        .await;
    source.await?;

    let Err(err) = result else {
        anyhow::bail!("expected a truncated body to fail");
    };
    assert!(matches!(err, ExecError::CopyInterrupted { .. }));
    assert!(err.detail().starts_with("copy failed: "), "{}", err.detail());
    let partial = std::fs::read(&target.destination)?;
    assert!(b"0123456789".starts_with(&partial));
    assert!(runner.launches().is_empty());
    Ok(())
}

#[tokio::test]
async fn trailing_separator_cannot_be_written() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/dir/");
        then.status(200).body(PAYLOAD);
    });
    let dir = tempfile::tempdir()?;
    let runner = Arc::new(RecordingRunner::new());
    let dispatcher = Dispatcher::new(
        runner.clone(),
        RemoteFetcher::new()?,
        dir.path().to_path_buf(),
    );

    let outcome = dispatcher
        .dispatch(&ActionRequest::new(server.url("/dir/"), "ExecRemoteFile"))
        .await?;

    assert!(!outcome.succeeded);
    assert!(
        outcome
            .error_detail
            .as_deref()
            .is_some_and(|detail| detail.starts_with("destination unwritable"))
    );
    mock.assert_calls(0);
    assert!(runner.launches().is_empty());
    Ok(())
}
