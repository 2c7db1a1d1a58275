//! Tracing setup for the binary.
//!
//! Human-readable events go to stderr, filtered by `RUST_LOG` (default
//! `info`). Every event down to `RUST_LOG_JSON` (default `debug`) is also
//! appended as JSON to a daily-rolling file under `LOG_FILE_PATH`. The
//! console report itself is written to stdout and never passes through here.

use anyhow::Result;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const DEFAULT_LOG_FILE: &str = "logs/bikeshare_watch.log";

/// Splits a log file path into the directory the appender rotates in and the
/// file name prefix. Bare file names land in `logs/`.
pub fn log_location(path: &str) -> (PathBuf, OsString) {
    let path = Path::new(path);
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("logs"),
    };
    let file = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("bikeshare_watch.log"));
    (dir, file)
}

fn filter_from(var: &str, fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(var).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init() -> Result<WorkerGuard> {
    let configured =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    let (dir, file) = log_location(&configured);

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file));

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(filter_from("RUST_LOG", "info"));

    let json_file = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(filter_from("RUST_LOG_JSON", "debug"));

    tracing_subscriber::registry()
        .with(console)
        .with(json_file)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_location_splits_dir_and_file() {
        let (dir, file) = log_location("/var/log/bikes/watch.log");
        assert_eq!(dir, PathBuf::from("/var/log/bikes"));
        assert_eq!(file, OsString::from("watch.log"));
    }

    #[test]
    fn test_bare_file_name_goes_to_logs_dir() {
        let (dir, file) = log_location("watch.log");
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(file, OsString::from("watch.log"));
    }

    #[test]
    fn test_default_location() {
        let (dir, file) = log_location(DEFAULT_LOG_FILE);
        assert_eq!(dir, PathBuf::from("logs"));
        assert_eq!(file, OsString::from("bikeshare_watch.log"));
    }
}
