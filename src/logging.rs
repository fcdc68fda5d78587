// File logging; the terminal itself belongs to the TUI

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PREFIX: &str = "bookai.log";

/// Install the global subscriber. Keep the guard alive until exit so buffered
/// lines get flushed.
pub fn init() -> Result<WorkerGuard> {
    let log_dir = crate::config::get_log_dir()?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    tracing::info!(dir = %log_dir.display(), "Logging initialized");
    Ok(guard)
}
