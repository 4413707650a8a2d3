//! Service wiring for the netgo binary.

use std::sync::Arc;

use clap::Parser;
use netgo_api::{ApiServer, ApiState, ShutdownSignal};
use netgo_exec::{Dispatcher, RemoteFetcher, ShellRunner};
use netgo_telemetry::{GlobalContextGuard, LoggingConfig, Metrics, init_logging};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{AppConfig, Cli, resolve_listen_addr};
use crate::error::{AppError, AppResult};

/// Entry point for the netgo boot sequence.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot start.
pub async fn run_app() -> AppResult<()> {
    let config = AppConfig::from_cli(Cli::parse())?;
    run_app_with(config).await
}

/// Boot sequence driven entirely by an already-validated configuration.
pub(crate) async fn run_app_with(config: AppConfig) -> AppResult<()> {
    let logging = LoggingConfig {
        level: &config.log_level,
        format: config.log_format,
        ..LoggingConfig::default()
    };
    init_logging(&logging).map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");

    info!(
        listen = %config.listen,
        save_to = %config.save_to.display(),
        "netgo bootstrap starting"
    );

    let shutdown = ShutdownSignal::new();
    let api = build_server(&config, shutdown.clone())?;
    let addr = resolve_listen_addr(&config.listen).await?;

    let signals = spawn_signal_listener(shutdown.clone());
    let serve_result = api.serve(addr, shutdown).await;
    if !signals.is_finished() {
        signals.abort();
    }

    serve_result.map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("netgo shutdown complete");
    Ok(())
}

fn build_server(config: &AppConfig, shutdown: ShutdownSignal) -> AppResult<ApiServer> {
    let telemetry = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let fetcher = RemoteFetcher::new().map_err(|err| AppError::exec("remote_fetcher.new", err))?;
    let dispatcher = Dispatcher::new(
        Arc::new(ShellRunner::new()),
        fetcher,
        config.save_to.clone(),
    );
    Ok(ApiServer::new(ApiState::new(dispatcher, telemetry, shutdown))
        .with_drain_grace(config.shutdown_grace))
}

/// Route operator stop requests (Ctrl-C, SIGTERM) into the shutdown signal.
fn spawn_signal_listener(shutdown: ShutdownSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_os_signal().await;
        if shutdown.fire() {
            info!("stop signal received; draining connections");
        }
    })
}

#[cfg(unix)]
async fn wait_for_os_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            warn!(error = %err, "SIGTERM handler unavailable");
            wait_for_ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        () = wait_for_ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_os_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}
