//! # Observability & Tracing
//!
//! Every crate in the workspace logs through the `tracing` macros with structured fields
//! (`task_id`, `food`, `table`, `topic`, ...). [`setup_tracing`] installs the subscriber
//! once, at the top of `main`.
//!
//! ## Outputs
//!
//! - **stderr**: always, compact format. stdout is left alone because a bus transport
//!   may be using it.
//! - **log file**: optional. Every line is appended to the given file (created if missing)
//!   by a background writer. Keep the returned [`WorkerGuard`] alive until exit so
//!   buffered lines are flushed.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Order lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Scheduler bookkeeping (submitted, started, completed)
//! RUST_LOG=debug cargo run
//!
//! # Only the scheduler crate
//! RUST_LOG=relay_runtime=trace cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Scheduler**: start, stop requests, draining, per-task start and outcome
//! - **Orders**: received, preparing (with the sampled delay), delivered
//! - **Failures**: rejected payloads, decode errors, publish failures, panics
//!
//! The compact format hides module paths (`with_target(false)`) and prints span fields
//! inline, so a delivery line carries the `task_id`, `food` and `table` of its span.

use crate::error::TracingError;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the tracing/logging infrastructure for the application.
///
/// Log levels are controlled by the `RUST_LOG` environment variable. With `log_file`
/// set, lines also go to that file and the returned guard must be held until exit.
pub fn setup_tracing(log_file: Option<&Path>) -> Result<Option<WorkerGuard>, TracingError> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}

/// A non-blocking writer that appends to `path`, never rotating.
pub fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), TracingError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TracingError::InvalidLogFile(path.to_path_buf()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)?;
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn file_writer_appends_log_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");

        for food in ["pizza", "tea"] {
            let (writer, guard) = file_writer(&path).unwrap();
            let subscriber = tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false));
            ::tracing::subscriber::with_default(subscriber, || {
                ::tracing::info!(food, table = 5, "Delivered");
            });
            drop(guard);
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2, "{contents}");
        assert!(lines[0].contains("Delivered") && lines[0].contains("food=\"pizza\""));
        assert!(lines[1].contains("food=\"tea\""));
    }

    #[test]
    fn file_writer_rejects_paths_without_a_file_name() {
        let err = file_writer(Path::new("/")).unwrap_err();
        assert!(matches!(err, TracingError::InvalidLogFile(_)));
    }
}
