//! Configuration for agent-canvas.
//!
//! Read from `~/.agent-canvas/config.yaml`. Every field is optional; a
//! missing file yields [`CanvasConfig::default`].
//!
//! ```yaml
//! status_dir: /var/run/agents/status
//! debounce_ms: 50
//! theme: dark
//! show_debug_panel: true
//! mcp_servers:
//!   - name: math
//!     transport: stdio
//!     command: python
//!     args: ["math_server.py"]
//!   - name: weather
//!     transport: sse
//!     url: http://localhost:8000/sse
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CanvasError, Result};
use crate::watcher::DEFAULT_DEBOUNCE_MS;

/// Directory name under `$HOME` for config, status and logs.
pub const CANVAS_DIR: &str = ".agent-canvas";

/// Valid theme names.
pub const THEMES: [&str; 3] = ["default", "dark", "light"];

/// Returns `~/.agent-canvas/`.
pub fn canvas_home() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CANVAS_DIR))
        .ok_or_else(|| CanvasError::internal("HOME directory could not be determined"))
}

/// Returns `~/.agent-canvas/config.yaml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(canvas_home()?.join("config.yaml"))
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Status directory override (defaults to `~/.agent-canvas/status/`)
    #[serde(default)]
    pub status_dir: Option<PathBuf>,

    /// Debounce for status file changes
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Theme name
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Show the per-agent debug overlay on startup
    #[serde(default = "default_show_debug_panel")]
    pub show_debug_panel: bool,

    /// MCP servers listed in the settings dialog
    #[serde(default)]
    pub mcp_servers: Vec<McpServerConfig>,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_show_debug_panel() -> bool {
    true
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            status_dir: None,
            debounce_ms: default_debounce_ms(),
            theme: default_theme(),
            show_debug_panel: default_show_debug_panel(),
            mcp_servers: Vec::new(),
        }
    }
}

/// How the MCP agent reaches a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum McpTransport {
    /// Spawned subprocess speaking over stdin/stdout
    Stdio,
    /// Remote server over server-sent events
    Sse,
}

impl fmt::Display for McpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Sse => write!(f, "sse"),
        }
    }
}

/// One MCP server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerConfig {
    pub name: String,
    pub transport: McpTransport,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl McpServerConfig {
    /// Where the server lives: the command line for stdio, the URL for sse.
    pub fn endpoint(&self) -> String {
        match self.transport {
            McpTransport::Stdio => {
                let mut parts = vec![self.command.clone().unwrap_or_default()];
                parts.extend(self.args.iter().cloned());
                parts.join(" ")
            }
            McpTransport::Sse => self.url.clone().unwrap_or_default(),
        }
    }
}

impl CanvasConfig {
    /// Load from the default path. A missing file gives defaults.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&default_config_path()?)
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file does not exist: {:?}", path);
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load from `path`. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CanvasError::config_not_found(path));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| CanvasError::io("reading config file", path, e))?;

        let config = Self::parse(&content).map_err(|e| match e {
            CanvasError::ConfigInvalid { message, .. } => CanvasError::ConfigInvalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;

        info!(path = ?path, servers = config.mcp_servers.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate YAML content.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file deserializes as null, not as an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self =
            serde_yaml::from_str(content).map_err(|e| CanvasError::ConfigInvalid {
                path: PathBuf::new(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check semantic constraints serde can't express.
    pub fn validate(&self) -> Result<()> {
        if !THEMES.contains(&self.theme.to_lowercase().as_str()) {
            return Err(CanvasError::validation(format!(
                "Invalid theme '{}', must be one of: {:?}",
                self.theme, THEMES
            )));
        }

        if self.debounce_ms == 0 {
            return Err(CanvasError::validation("debounce_ms must be at least 1"));
        }

        let mut seen = HashSet::new();
        for server in &self.mcp_servers {
            if server.name.trim().is_empty() {
                return Err(CanvasError::validation("MCP server name must not be empty"));
            }
            if !seen.insert(server.name.as_str()) {
                return Err(CanvasError::validation(format!(
                    "duplicate MCP server name '{}'",
                    server.name
                )));
            }
            match server.transport {
                McpTransport::Stdio if server.command.as_deref().unwrap_or("").is_empty() => {
                    return Err(CanvasError::validation(format!(
                        "stdio MCP server '{}' needs a command",
                        server.name
                    )));
                }
                McpTransport::Sse if server.url.as_deref().unwrap_or("").is_empty() => {
                    return Err(CanvasError::validation(format!(
                        "sse MCP server '{}' needs a url",
                        server.name
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Status directory, falling back to `~/.agent-canvas/status/`.
    pub fn resolved_status_dir(&self) -> Result<PathBuf> {
        match &self.status_dir {
            Some(dir) => Ok(dir.clone()),
            None => crate::status::default_status_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
status_dir: /tmp/agents
theme: dark
show_debug_panel: false
mcp_servers:
  - name: math
    transport: stdio
    command: python
    args: ["math_server.py"]
  - name: weather
    transport: sse
    url: http://localhost:8000/sse
"#;

    #[test]
    fn test_parse_full_config() {
        let config = CanvasConfig::parse(SAMPLE).unwrap();

        assert_eq!(config.status_dir, Some(PathBuf::from("/tmp/agents")));
        assert_eq!(config.theme, "dark");
        assert!(!config.show_debug_panel);
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.mcp_servers.len(), 2);
        assert_eq!(config.mcp_servers[0].endpoint(), "python math_server.py");
        assert_eq!(config.mcp_servers[1].transport, McpTransport::Sse);
        assert_eq!(config.mcp_servers[1].endpoint(), "http://localhost:8000/sse");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(CanvasConfig::parse("").unwrap(), CanvasConfig::default());
        assert_eq!(CanvasConfig::parse("{}").unwrap(), CanvasConfig::default());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = CanvasConfig::parse("mcp_servers: [").unwrap_err();
        assert!(matches!(err, CanvasError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_rejects_unknown_theme() {
        let err = CanvasConfig::parse("theme: neon").unwrap_err();
        assert!(matches!(err, CanvasError::ConfigValidation { .. }));
    }

    #[test]
    fn test_rejects_zero_debounce() {
        let err = CanvasConfig::parse("debounce_ms: 0").unwrap_err();
        assert!(matches!(err, CanvasError::ConfigValidation { .. }));
        assert!(err.to_string().contains("debounce_ms"));

        assert_eq!(CanvasConfig::parse("debounce_ms: 1").unwrap().debounce_ms, 1);
    }

    #[test]
    fn test_rejects_duplicate_server_names() {
        let yaml = r#"
mcp_servers:
  - { name: math, transport: stdio, command: python }
  - { name: math, transport: sse, url: "http://localhost:8000/sse" }
"#;
        let err = CanvasConfig::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_rejects_incomplete_servers() {
        let stdio = "mcp_servers: [{ name: math, transport: stdio }]";
        assert!(CanvasConfig::parse(stdio).unwrap_err().to_string().contains("command"));

        let sse = "mcp_servers: [{ name: weather, transport: sse }]";
        assert!(CanvasConfig::parse(sse).unwrap_err().to_string().contains("url"));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = CanvasConfig::load_or_default(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(config, CanvasConfig::default());
    }

    #[test]
    fn test_load_from_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = CanvasConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, CanvasError::ConfigNotFound { .. }));
        assert!(err.is_config_error());
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_load_from_reports_path_on_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "theme: [").unwrap();

        match CanvasConfig::load_from(&path).unwrap_err() {
            CanvasError::ConfigInvalid { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = CanvasConfig::load_from(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.is_config_error());
    }
}
