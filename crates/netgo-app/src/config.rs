//! Flags and environment variables for the netgo binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use netgo_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::error::{AppError, AppResult};

/// Listen address used when none is supplied.
pub const DEFAULT_HTTP_ADDR: &str = ":80";

/// Milliseconds open connections get to finish after shutdown fires.
pub const DEFAULT_SHUTDOWN_GRACE_MS: u64 = 2_000;

const ALL_INTERFACES: &str = "0.0.0.0";

/// Raw command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "netgo", about = "Launch commands and remote files on request")]
pub struct Cli {
    /// HTTP listen address. `:port` listens on all interfaces.
    #[arg(long = "http", env = "NETGO_HTTP", default_value = DEFAULT_HTTP_ADDR)]
    pub http: String,
    /// Directory remote files are saved to. Defaults to the working directory.
    #[arg(long = "save-to", env = "NETGO_SAVE_TO")]
    pub save_to: Option<PathBuf>,
    /// Log level or `EnvFilter` directive.
    #[arg(long, env = "NETGO_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
    /// Log output format (`json` or `pretty`). Defaults by build profile.
    #[arg(long, env = "NETGO_LOG_FORMAT")]
    pub log_format: Option<String>,
    /// Milliseconds to let open connections finish once shutdown is requested.
    #[arg(
        long,
        env = "NETGO_SHUTDOWN_GRACE_MS",
        default_value_t = DEFAULT_SHUTDOWN_GRACE_MS
    )]
    pub shutdown_grace_ms: u64,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address as given, after `:port` expansion.
    pub listen: String,
    /// Directory remote files are saved to.
    pub save_to: PathBuf,
    /// Log level directive.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Drain deadline applied after shutdown fires.
    pub shutdown_grace: Duration,
}

impl AppConfig {
    /// Validate raw arguments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] for an empty listen address, an
    /// unknown log format, or a save directory that is not a directory, and
    /// [`AppError::Io`] if the working directory cannot be read.
    pub fn from_cli(cli: Cli) -> AppResult<Self> {
        let listen = normalize_listen_addr(&cli.http)?;
        let save_to = match cli.save_to {
            Some(path) => path,
            None => std::env::current_dir()
                .map_err(|source| AppError::io("current_dir", source))?,
        };
        if !save_to.is_dir() {
            return Err(AppError::invalid_config(
                "save_to",
                "not_a_directory",
                save_to.display().to_string(),
            ));
        }
        let log_format = match cli.log_format.as_deref() {
            Some(raw) => LogFormat::from_str(raw)
                .map_err(|_| AppError::invalid_config("log_format", "unknown", raw))?,
            None => LogFormat::infer(),
        };
        Ok(Self {
            listen,
            save_to,
            log_level: cli.log_level,
            log_format,
            shutdown_grace: Duration::from_millis(cli.shutdown_grace_ms),
        })
    }
}

/// Expand a `:port` address to all interfaces.
///
/// # Errors
///
/// Returns [`AppError::InvalidConfig`] when the address is blank.
pub fn normalize_listen_addr(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_config("http", "empty", raw));
    }
    if trimmed.starts_with(':') {
        return Ok(format!("{ALL_INTERFACES}{trimmed}"));
    }
    Ok(trimmed.to_string())
}

/// Resolve a listen address, looking up host names when needed.
///
/// # Errors
///
/// Returns [`AppError::Io`] when resolution fails and
/// [`AppError::InvalidConfig`] when it yields no addresses.
pub async fn resolve_listen_addr(listen: &str) -> AppResult<SocketAddr> {
    if let Ok(addr) = listen.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let mut addrs = tokio::net::lookup_host(listen)
        .await
        .map_err(|source| AppError::io("listen.resolve", source))?;
    addrs
        .next()
        .ok_or_else(|| AppError::invalid_config("http", "unresolvable", listen))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Cli> {
        let argv = std::iter::once("netgo").chain(args.iter().copied());
        Ok(Cli::try_parse_from(argv)?)
    }

    #[test]
    fn go_style_port_listens_everywhere() -> AppResult<()> {
        assert_eq!(normalize_listen_addr(":80")?, "0.0.0.0:80");
        assert_eq!(normalize_listen_addr(" :8080 ")?, "0.0.0.0:8080");
        assert_eq!(normalize_listen_addr("127.0.0.1:9000")?, "127.0.0.1:9000");
        assert!(matches!(
            normalize_listen_addr("  "),
            Err(AppError::InvalidConfig { field: "http", .. })
        ));
        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let save_to = dir.path().to_string_lossy().to_string();
        let cli = parse(&[
            "--http",
            ":8080",
            "--save-to",
            &save_to,
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "--shutdown-grace-ms",
            "250",
        ])?;

        let config = AppConfig::from_cli(cli)?;

        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.save_to, dir.path());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.shutdown_grace, Duration::from_millis(250));
        Ok(())
    }

    #[test]
    fn shutdown_grace_rejects_non_numeric_values() {
        assert!(parse(&["--shutdown-grace-ms", "soon"]).is_err());
    }

    #[test]
    fn save_to_must_be_a_directory() -> anyhow::Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        let path = file.path().to_string_lossy().to_string();
        let cli = parse(&["--save-to", &path])?;

        let result = AppConfig::from_cli(cli);

        assert!(matches!(
            result,
            Err(AppError::InvalidConfig {
                field: "save_to",
                reason: "not_a_directory",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn unknown_log_format_is_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let save_to = dir.path().to_string_lossy().to_string();
        let cli = parse(&["--save-to", &save_to, "--log-format", "xml"])?;

        let result = AppConfig::from_cli(cli);

        assert!(matches!(
            result,
            Err(AppError::InvalidConfig {
                field: "log_format",
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn literal_addresses_resolve_without_lookup() -> AppResult<()> {
        let addr = resolve_listen_addr("127.0.0.1:0").await?;
        assert_eq!(addr, SocketAddr::from(([127, 0, 0, 1], 0)));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_addresses_fail_to_resolve() {
        let result = resolve_listen_addr("no-port-here").await;
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
