//! Status file reader for agent snapshots in `~/.agent-canvas/status/*.json`.
//!
//! The agent runtime writes one file per agent, named after the agent id
//! (`travel_agent.json`, `research_agent.json`, `mcp-agent.json`). A missing
//! file means the agent has not reported yet; a corrupted file is logged and
//! treated as idle so the canvas keeps rendering.
//!
//! ## Example
//!
//! ```no_run
//! use canvas_core::agent::AgentId;
//! use canvas_core::status::StatusReader;
//!
//! fn main() -> canvas_core::Result<()> {
//!     let reader = StatusReader::new(None)?;
//!     let snapshot = reader.read_agent(AgentId::Travel)?;
//!     println!("travel running: {}", snapshot.map(|s| s.running).unwrap_or(false));
//!     Ok(())
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::agent::{AgentId, AgentSnapshot};
use crate::error::{CanvasError, Result};
use crate::source::AgentStatusSource;

/// Reader for agent status files.
///
/// Reads on every call, so a corrupt file is seen on every draw. Each
/// distinct failure is logged at `warn` once; repeats drop to `debug`.
#[derive(Debug, Clone)]
pub struct StatusReader {
    status_dir: PathBuf,
    last_errors: RefCell<HashMap<AgentId, String>>,
}

impl StatusReader {
    /// Create a new StatusReader.
    ///
    /// If `status_dir` is None, uses `~/.agent-canvas/status/`.
    pub fn new(status_dir: Option<PathBuf>) -> Result<Self> {
        let status_dir = match status_dir {
            Some(dir) => dir,
            None => default_status_dir()?,
        };

        debug!("StatusReader initialized with directory: {:?}", status_dir);

        Ok(Self {
            status_dir,
            last_errors: RefCell::new(HashMap::new()),
        })
    }

    /// Directory being read.
    pub fn status_dir(&self) -> &Path {
        &self.status_dir
    }

    /// Path to an agent's status file.
    pub fn status_file_path(&self, agent: AgentId) -> PathBuf {
        status_file_path(&self.status_dir, agent)
    }

    /// Read one agent's status file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read_agent(&self, agent: AgentId) -> Result<Option<AgentSnapshot>> {
        let path = self.status_file_path(agent);

        if !path.exists() {
            debug!(agent = %agent, "Status file not found: {:?}", path);
            return Ok(None);
        }

        parse_status_file(&path).map(Some)
    }

    /// Remember `error` for `agent`. Returns true if it differs from the last
    /// failure recorded for that agent.
    fn record_failure(&self, agent: AgentId, error: &CanvasError) -> bool {
        let message = error.to_string();
        let mut last_errors = self.last_errors.borrow_mut();
        if last_errors.get(&agent) == Some(&message) {
            return false;
        }
        last_errors.insert(agent, message);
        true
    }

    fn clear_failure(&self, agent: AgentId) {
        self.last_errors.borrow_mut().remove(&agent);
    }
}

impl AgentStatusSource for StatusReader {
    fn snapshot(&self, agent: AgentId) -> AgentSnapshot {
        match self.read_agent(agent) {
            Ok(found) => {
                self.clear_failure(agent);
                found.unwrap_or_default()
            }
            Err(e) => {
                if self.record_failure(agent, &e) {
                    warn!(agent = %agent, error = %e, "Treating unreadable status file as idle");
                } else {
                    debug!(agent = %agent, "Status file still unreadable");
                }
                AgentSnapshot::idle()
            }
        }
    }
}

/// Returns `~/.agent-canvas/status/`.
pub fn default_status_dir() -> Result<PathBuf> {
    Ok(crate::config::canvas_home()?.join("status"))
}

/// Path of an agent's status file inside `status_dir`.
pub fn status_file_path(status_dir: &Path, agent: AgentId) -> PathBuf {
    status_dir.join(format!("{}.json", agent.as_str()))
}

/// Map a status file path back to its agent.
pub fn agent_for_path(path: &Path) -> Option<AgentId> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(AgentId::from_id)
}

/// Parse a status file.
pub fn parse_status_file(path: &Path) -> Result<AgentSnapshot> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CanvasError::io("reading status file", path, e))?;

    serde_json::from_str(&content).map_err(|e| CanvasError::status_parse(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn reader(dir: &TempDir) -> StatusReader {
        StatusReader::new(Some(dir.path().to_path_buf())).unwrap()
    }

    #[test]
    fn test_missing_file_is_none_and_idle() {
        let dir = TempDir::new().unwrap();
        let reader = reader(&dir);

        assert!(reader.read_agent(AgentId::Travel).unwrap().is_none());
        assert_eq!(reader.snapshot(AgentId::Travel), AgentSnapshot::idle());
    }

    #[test]
    fn test_reads_running_agent() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("research_agent.json"),
            r#"{"running": true, "name": "Research Agent", "nodeName": "search",
                "updated_at": "2026-10-17T09:30:00Z"}"#,
        )
        .unwrap();

        let snapshot = reader(&dir).read_agent(AgentId::Research).unwrap().unwrap();
        assert!(snapshot.running);
        assert_eq!(snapshot.node_name.as_deref(), Some("search"));
        assert!(snapshot.updated_at.is_some());
    }

    #[test]
    fn test_corrupted_file_reads_as_idle() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mcp-agent.json"), "{ running: yes").unwrap();
        let reader = reader(&dir);

        assert!(matches!(
            reader.read_agent(AgentId::Mcp),
            Err(CanvasError::StatusFileParse { .. })
        ));
        assert_eq!(reader.snapshot(AgentId::Mcp), AgentSnapshot::idle());
    }

    #[test]
    fn test_repeated_failure_is_recorded_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("travel_agent.json");
        fs::write(&path, "{ running: yes").unwrap();
        let reader = reader(&dir);

        let err = reader.read_agent(AgentId::Travel).unwrap_err();
        assert!(reader.record_failure(AgentId::Travel, &err));
        assert!(!reader.record_failure(AgentId::Travel, &err));

        // Drawing repeatedly keeps the agent idle without re-recording
        assert_eq!(reader.snapshot(AgentId::Travel), AgentSnapshot::idle());
        assert!(!reader.record_failure(AgentId::Travel, &err));

        // A good read clears the record, so the next breakage is new again
        fs::write(&path, r#"{"running": true}"#).unwrap();
        assert!(reader.snapshot(AgentId::Travel).running);
        assert!(reader.record_failure(AgentId::Travel, &err));
    }

    #[test]
    fn test_agent_for_path() {
        assert_eq!(
            agent_for_path(Path::new("/tmp/status/travel_agent.json")),
            Some(AgentId::Travel)
        );
        assert_eq!(agent_for_path(Path::new("/tmp/status/travel_agent.tmp")), None);
        assert_eq!(agent_for_path(Path::new("/tmp/status/weather.json")), None);
    }
}
