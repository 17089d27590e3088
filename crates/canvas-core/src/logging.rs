//! Logging infrastructure for agent-canvas.
//!
//! Structured logging using the `tracing` ecosystem. The canvas owns the
//! terminal's alternate screen while it runs, so everything goes to a JSON
//! lines file under `~/.agent-canvas/logs/` instead of stderr.
//!
//! ## Example
//!
//! ```no_run
//! use canvas_core::logging;
//!
//! let _guard = logging::init_logging(None, false).expect("logging init");
//!
//! tracing::info!("canvas started");
//! tracing::debug!(agent = "research_agent", node = "search", "agent running");
//! ```

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{CanvasError, Result};

/// Log file name inside the log directory.
pub const LOG_FILE_NAME: &str = "agent-canvas.log";

/// Guard that must be held to ensure log flushing on shutdown.
///
/// Keep this guard alive for the lifetime of the application.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the agent-canvas logging system.
///
/// Logs are written to `<log_dir>/agent-canvas.log` (JSON lines, rolled daily).
/// `RUST_LOG` overrides the default filter.
///
/// # Arguments
///
/// * `log_dir` - Optional custom log directory. Defaults to `~/.agent-canvas/logs/`
/// * `verbose` - If true, sets log level to DEBUG. Otherwise uses INFO.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let log_dir = match log_dir {
        Some(dir) => dir,
        None => default_log_dir()?,
    };

    std::fs::create_dir_all(&log_dir).map_err(|e| CanvasError::DirectoryCreation {
        path: log_dir.clone(),
        source: e,
    })?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_span_list(true)
        .with_file(verbose)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| CanvasError::internal(format!("logging already initialized: {e}")))?;

    tracing::debug!(log_dir = %log_dir.display(), verbose, "logging initialized");

    Ok(LogGuard {
        _file_guard: Some(file_guard),
    })
}

/// Default filter directive for the workspace crates.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("agent_canvas={level},canvas_core={level},canvas_tui={level}")
}

/// Initialize minimal console-only logging for testing.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Returns `~/.agent-canvas/logs/`.
pub fn default_log_dir() -> Result<PathBuf> {
    Ok(crate::config::canvas_home()?.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_default_log_dir() {
        let original_home = std::env::var_os("HOME");
        // SAFETY: serialized with the other tests that touch HOME
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir();

        // SAFETY: as above
        unsafe {
            match original_home {
                Some(home) => std::env::set_var("HOME", home),
                None => std::env::remove_var("HOME"),
            }
        }

        assert_eq!(dir.unwrap(), PathBuf::from("/tmp/test-home/.agent-canvas/logs"));
    }

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(
            default_filter(false),
            "agent_canvas=info,canvas_core=info,canvas_tui=info"
        );
        assert!(default_filter(true).contains("canvas_tui=debug"));
    }

    #[test]
    fn test_init_test_logging() {
        init_test_logging();
    }
}
