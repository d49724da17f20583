//! Log routing for the server and the CLI.
//!
//! The server logs to stdout and appends the same events to a file (`DOCGEN_LOG_FILE`, or
//! `logs/docgen.log`). The CLI logs to stderr only, keeping stdout for extracted or generated
//! text.
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_PATH: &str = "logs/docgen.log";
const SERVER_FILTER: &str = "info,tower_http=debug";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn env_filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the server subscriber.
///
/// `RUST_LOG` overrides the default filter, which logs adapters at `info` and HTTP request
/// spans at `debug`. When the log file cannot be opened the server keeps running with stdout
/// logging only.
pub fn init_tracing() {
    let registry = tracing_subscriber::registry()
        .with(env_filter_or(SERVER_FILTER))
        .with(fmt::layer().with_target(false).compact());

    match open_log_file() {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        None => registry.init(),
    }
}

/// Install the CLI subscriber: stderr only, `warn` unless `verbose`.
pub fn init_cli_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(env_filter_or(default_level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn log_file_path() -> PathBuf {
    std::env::var_os("DOCGEN_LOG_FILE")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH))
}

/// Open the log file for appending behind a non-blocking writer whose guard lives for the
/// rest of the process.
fn open_log_file() -> Option<NonBlocking> {
    let path = log_file_path();
    match append_to(&path) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(writer)
        }
        Err(err) => {
            // No subscriber is installed yet.
            eprintln!("Logging to stdout only; cannot open {}: {err}", path.display());
            None
        }
    }
}

fn append_to(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
