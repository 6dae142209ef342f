use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Environment variable holding the log filter (e.g. `debug`, `tasknest=trace`)
pub const LOG_ENV: &str = "TASKNEST_LOG";

/// Keeps the non-blocking log writer alive; drop it last.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Route tracing events to `<data_dir>/logs/tasknest.log`, rotated daily.
///
/// The TUI owns the terminal, so nothing is written to stdout/stderr.
/// Returns None if the log directory can't be created or a subscriber is
/// already installed; the app runs without logging in that case.
pub fn init_logging(data_dir: &Path) -> Option<LoggingGuard> {
    let log_dir = data_dir.join("logs");
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("warning: could not create log directory {}: {}", log_dir.display(), e);
        return None;
    }

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "tasknest.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }

    tracing::info!(dir = %log_dir.display(), "logging initialized");
    Some(LoggingGuard { _guard: guard })
}
