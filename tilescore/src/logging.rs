//! Logging infrastructure.
//!
//! Provides structured logging to stdout, with optional file output:
//! - Prints to stdout for CLI use
//! - Optionally writes to `<log_dir>/tilescore.log` (cleared on session start)
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file name inside the log directory.
const LOG_FILE: &str = "tilescore.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the logging system.
///
/// Sets up a stdout layer filtered by RUST_LOG (defaulting to info, or
/// debug when `verbose` is set). When `log_dir` is given, the directory
/// is created, the previous session's log file cleared, and a non-blocking
/// file layer added.
///
/// # Arguments
///
/// * `verbose` - Lower the default filter from info to debug
/// * `log_dir` - Optional directory for the log file
///
/// # Returns
///
/// LoggingGuard that must be kept alive for logging to work
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Result<LoggingGuard, io::Error> {
    let default_directive = if verbose {
        "tilescore=debug,tilescore_cli=debug"
    } else {
        "tilescore=info,tilescore_cli=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .with_target(false);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match log_dir {
        Some(dir) => {
            // Create the log directory and clear the previous session's file
            fs::create_dir_all(dir)?;
            fs::write(dir.join(LOG_FILE), "")?;

            let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);

            registry.with(file_layer).init();
            Ok(LoggingGuard {
                _file_guard: Some(file_guard),
            })
        }
        None => {
            registry.init();
            Ok(LoggingGuard { _file_guard: None })
        }
    }
}

/// Get default log directory path.
pub fn default_log_dir() -> &'static str {
    "logs"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        assert_eq!(default_log_dir(), "logs");
    }

    #[test]
    fn test_creates_directory_and_clears_file() {
        // Can't call init_logging twice in one process because of the
        // global subscriber, so exercise the file operations directly
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        let log_path = log_dir.join(LOG_FILE);

        fs::create_dir_all(&log_dir).unwrap();
        fs::write(&log_path, "old log data").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "old log data");

        fs::write(&log_path, "").unwrap();
        assert_eq!(fs::read_to_string(&log_path).unwrap(), "");
    }

    #[test]
    fn test_guard_without_file_writer() {
        let guard = LoggingGuard { _file_guard: None };
        drop(guard);
    }
}
