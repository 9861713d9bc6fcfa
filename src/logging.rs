//! Logger bootstrap for the planner binary.
//!
//! The library only emits `log` records; installing a backend is left to the
//! executable, which calls `init_logging` once at startup.

use std::path::Path;

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "holidayplanner";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level `{level}`: {source}")]
    InvalidLevel {
        level: String,
        #[source]
        source: FlexiLoggerError,
    },
    #[error("failed to start logger: {0}")]
    Backend(#[source] FlexiLoggerError),
}

/// Maps user spellings onto the level names flexi_logger understands.
pub fn normalize_level(level: &str) -> Option<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

/// Starts logging at `level`, into rotating files under `log_dir` when given
/// and to stderr otherwise. Keep the returned handle alive for the process
/// lifetime; dropping it flushes and stops the logger.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<LoggerHandle, LoggingError> {
    let spec = normalize_level(level).unwrap_or(level);
    let logger = Logger::try_with_env_or_str(spec).map_err(|source| LoggingError::InvalidLevel {
        level: level.to_owned(),
        source,
    })?;

    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format),
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format),
    };

    let handle = logger.start().map_err(LoggingError::Backend)?;
    info!(
        "event=app_start module=logging status=ok version={} level={}",
        env!("CARGO_PKG_VERSION"),
        spec
    );
    Ok(handle)
}
