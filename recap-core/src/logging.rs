//! Tracing setup for recap binaries.
//!
//! The engine only emits events: skipped records, report assembly, and
//! out-of-year counts. Installing a subscriber is left to the binary, which
//! calls [`init`] once at startup. Output goes to
//! `$XDG_STATE_HOME/recap/recap.log.<date>`.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// File name prefix of the rolling log.
pub const LOG_FILE_NAME: &str = "recap.log";

/// Install the global file subscriber.
///
/// `RUST_LOG` overrides `config.level`. Fails if a subscriber is already set.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let (writer, guard) = tracing_appender::non_blocking(daily_appender(&log_dir, config.max_files)?);

    let report_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(level_filter(&config.level))
        .with(report_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))?;

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        max_files = config.max_files,
        "recap logging ready"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Daily appender in `dir`, pruned to `max_files` (at least one).
fn daily_appender(dir: &Path, max_files: usize) -> Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_NAME)
        .max_log_files(max_files.max(1))
        .build(dir)
        .map_err(|e| Error::Config(format!("failed to open log file in {}: {}", dir.display(), e)))
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Route events to the test harness writer. Safe to call repeatedly.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}

/// Flushes buffered log lines when dropped; hold it for the life of `main`.
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Path of the current log file, without the date suffix.
pub fn log_file_path() -> PathBuf {
    Config::log_path()
}
