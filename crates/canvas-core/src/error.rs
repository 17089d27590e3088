//! Error types for agent-canvas operations.
//!
//! The view logic itself never fails: missing agent names and node names are
//! replaced by defaults. [`CanvasError`] covers the ambient surface around it:
//! configuration, status files, the file watcher and the terminal.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`CanvasError`].
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Error type for all agent-canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Status Errors
    // =========================================================================
    /// Agent status file could not be parsed
    #[error("Invalid status file {path}: {message}")]
    StatusFileParse {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// File watcher initialization failed
    #[error("Failed to initialize file watcher: {message}")]
    WatcherInit { message: String },

    // =========================================================================
    // TUI Errors
    // =========================================================================
    /// Terminal initialization failed
    #[error("Terminal initialization failed: {message}")]
    TerminalInit { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in agent-canvas)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CanvasError {
    /// Create a ConfigNotFound error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a status file parse error from a serde failure
    pub fn status_parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::StatusFileParse {
            path: path.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Create ~/.agent-canvas/config.yaml or pass --config")
            }
            Self::ConfigInvalid { .. } => Some("Check YAML syntax in the configuration file"),
            Self::ConfigValidation { .. } => Some(
                "Check theme, debounce_ms and mcp_servers (unique names, stdio needs a command, sse a url)",
            ),
            Self::WatcherInit { .. } => Some("Check that the status directory is readable"),
            Self::TerminalInit { .. } => Some("Try running in a different terminal"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_error() {
        let err = CanvasError::config_not_found("/home/user/.agent-canvas/config.yaml");
        assert!(err.to_string().contains("Configuration not found"));
        assert!(err.is_config_error());
        assert!(err.guidance().is_some());
    }

    #[test]
    fn test_status_parse_error_keeps_path() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CanvasError::status_parse("/tmp/status/mcp-agent.json", source);
        assert!(err.to_string().contains("mcp-agent.json"));
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_error_classification() {
        assert!(!CanvasError::internal("bug").is_config_error());
        assert!(CanvasError::validation("duplicate").is_config_error());

        let err = CanvasError::TerminalInit {
            message: "no tty".into(),
        };
        assert!(!err.is_config_error());
        assert_eq!(err.guidance(), Some("Try running in a different terminal"));
    }
}
