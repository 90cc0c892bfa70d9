//! Log subscriber setup for the binary.
//!
//! Events go to stdout and, without ANSI colours, to an append-only file.
//! Library code only emits `tracing` events; installing the subscriber is
//! left to `main`, so tests can capture or silence output.

use std::{fs::OpenOptions, path::Path};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::StartupError;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the life of the process.
///
/// # Errors
/// Returns [`StartupError::LogFileUnavailable`] if the log file cannot be
/// opened for appending, or [`StartupError::Subscriber`] if a global
/// subscriber is already installed.
pub fn init(log_file: &Path) -> Result<WorkerGuard, StartupError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|source| StartupError::LogFileUnavailable { path: log_file.to_owned(), source })?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| StartupError::Subscriber(e.to_string()))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritable_log_path_is_startup_error() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(e) => panic!("tempdir failed: {e}"),
        };
        let missing_parent = dir.path().join("no-such-dir").join("api.log");
        let result = init(&missing_parent);
        assert!(
            matches!(result, Err(StartupError::LogFileUnavailable { .. })),
            "missing parent directory must be fatal"
        );
    }
}
