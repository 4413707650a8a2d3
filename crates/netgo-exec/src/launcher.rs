//! Detached process runners.
//!
//! # Design
//! - `Runner` is the narrow capability the dispatcher depends on.
//! - `ShellRunner` starts real children and never waits on them.
//! - `RecordingRunner` records launch requests without spawning anything.

use std::io;
use std::process::Stdio;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::process::Command;
use tracing::debug;

use crate::error::{ExecError, ExecResult};
use crate::model::LaunchSpec;

/// Starts processes on behalf of the dispatcher.
pub trait Runner: Send + Sync {
    /// Start `spec` and return as soon as the child exists.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::ProcessStart`] when the process cannot be started.
    fn launch(&self, spec: &LaunchSpec) -> ExecResult<()>;
}

/// Runner that spawns real child processes through the platform shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    /// Construct the platform runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Runner for ShellRunner {
    fn launch(&self, spec: &LaunchSpec) -> ExecResult<()> {
        let mut command = platform_command(spec);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);

        let child = command.spawn().map_err(|source| ExecError::ProcessStart {
            command: spec.to_string(),
            source,
        })?;
        debug!(pid = ?child.id(), command = %spec, "process started");
        // Dropping the handle detaches the child; tokio reaps it once it exits.
        drop(child);
        Ok(())
    }
}

#[cfg(windows)]
fn platform_command(spec: &LaunchSpec) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg("start");
    match spec {
        LaunchSpec::Command(line) => {
            command.raw_arg(line);
        }
        LaunchSpec::File(path) => {
            command.arg("").arg(path);
        }
    }
    command
}

#[cfg(not(windows))]
fn platform_command(spec: &LaunchSpec) -> Command {
    match spec {
        LaunchSpec::Command(line) => {
            let mut command = Command::new("sh");
            command.arg("-c").arg(line);
            command
        }
        LaunchSpec::File(path) => Command::new(path),
    }
}

/// Runner that records every launch request instead of starting processes.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    launches: Mutex<Vec<LaunchSpec>>,
    failure: Option<io::ErrorKind>,
}

impl RecordingRunner {
    /// Construct an empty recorder that accepts every launch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a recorder that rejects every launch with `kind`.
    #[must_use]
    pub const fn failing(kind: io::ErrorKind) -> Self {
        Self {
            launches: Mutex::new(Vec::new()),
            failure: Some(kind),
        }
    }

    /// Launch requests received so far, in order. Rejected launches are included.
    #[must_use]
    pub fn launches(&self) -> Vec<LaunchSpec> {
        lock(&self.launches).clone()
    }
}

impl Runner for RecordingRunner {
    fn launch(&self, spec: &LaunchSpec) -> ExecResult<()> {
        lock(&self.launches).push(spec.clone());
        match self.failure {
            Some(kind) => Err(ExecError::ProcessStart {
                command: spec.to_string(),
                source: io::Error::new(kind, "launch rejected by recording runner"),
            }),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
