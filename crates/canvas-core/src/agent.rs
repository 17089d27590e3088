//! Agent status model and the active-agent reducer.
//!
//! Three agents are observed: a travel planner, a research agent and an MCP
//! task agent. Each render the canvas takes one [`AgentSnapshot`] per agent,
//! normalizes it into an [`AgentStatus`] and picks at most one of them as the
//! currently running agent.
//!
//! ## Example
//!
//! ```
//! use canvas_core::agent::{AgentBoard, AgentId, AgentSnapshot};
//! use canvas_core::source::StaticSource;
//!
//! let source = StaticSource::new()
//!     .with(AgentId::Research, AgentSnapshot::running(None, Some("search")));
//!
//! let board = AgentBoard::from_source(&source);
//! let active = board.active().expect("research is running");
//! assert_eq!(active.name, "Research Agent");
//! assert_eq!(active.node_name, "search");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::AgentStatusSource;

/// The agents observed by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentId {
    /// Trip planning agent
    Travel,
    /// Topic research agent
    Research,
    /// General purpose agent running MCP tools
    Mcp,
}

impl AgentId {
    /// Display priority. When several agents run at once the first one wins.
    pub const PRIORITY: [AgentId; 3] = [AgentId::Travel, AgentId::Research, AgentId::Mcp];

    /// Identifier used by the agent runtime and for status file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentId::Travel => "travel_agent",
            AgentId::Research => "research_agent",
            AgentId::Mcp => "mcp-agent",
        }
    }

    /// Label shown when the runtime reports no name.
    pub fn default_name(&self) -> &'static str {
        match self {
            AgentId::Travel => "Travel Agent",
            AgentId::Research => "Research Agent",
            AgentId::Mcp => "MCP Agent",
        }
    }

    /// Parse a runtime identifier.
    pub fn from_id(id: &str) -> Option<AgentId> {
        Self::PRIORITY.into_iter().find(|agent| agent.as_str() == id)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw status for one agent as reported by a status source.
///
/// Every field is optional on the wire. Status files look like:
/// ```json
/// { "running": true, "name": "Research Agent", "nodeName": "search" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Whether the agent is executing right now
    #[serde(default)]
    pub running: bool,

    /// Display name reported by the runtime
    #[serde(default)]
    pub name: Option<String>,

    /// Workflow node currently executing
    #[serde(default, alias = "nodeName")]
    pub node_name: Option<String>,

    /// When the runtime last wrote this snapshot
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AgentSnapshot {
    /// Snapshot of an agent that is not running.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Snapshot of a running agent.
    pub fn running(name: Option<&str>, node_name: Option<&str>) -> Self {
        Self {
            running: true,
            name: name.map(str::to_string),
            node_name: node_name.map(str::to_string),
            updated_at: None,
        }
    }
}

/// Normalized status for one agent, recomputed every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStatus {
    /// Which agent this is
    pub agent: AgentId,
    /// Whether the agent is running
    pub status: bool,
    /// Display name, never empty
    pub name: String,
    /// Current node, empty when unknown
    pub node_name: String,
}

impl AgentStatus {
    /// Apply the default policy: a missing or empty name becomes the agent's
    /// fixed label, a missing node name becomes the empty string.
    pub fn from_snapshot(agent: AgentId, snapshot: &AgentSnapshot) -> Self {
        let name = snapshot
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(agent.default_name())
            .to_string();

        Self {
            agent,
            status: snapshot.running,
            name,
            node_name: snapshot.node_name.clone().unwrap_or_default(),
        }
    }

    /// Idle status with default labels.
    pub fn idle(agent: AgentId) -> Self {
        Self::from_snapshot(agent, &AgentSnapshot::idle())
    }
}

/// Return the first running agent, if any.
///
/// Order of `statuses` is the priority order. No running agent is a normal
/// result, not a failure.
pub fn currently_running(statuses: &[AgentStatus]) -> Option<&AgentStatus> {
    statuses.iter().find(|agent| agent.status)
}

/// One status per agent, in [`AgentId::PRIORITY`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentBoard {
    statuses: [AgentStatus; 3],
}

impl AgentBoard {
    /// Build a board by asking the source for each agent's snapshot.
    pub fn from_source(source: &dyn AgentStatusSource) -> Self {
        Self {
            statuses: AgentId::PRIORITY
                .map(|agent| AgentStatus::from_snapshot(agent, &source.snapshot(agent))),
        }
    }

    /// Board with every agent idle.
    pub fn idle() -> Self {
        Self {
            statuses: AgentId::PRIORITY.map(AgentStatus::idle),
        }
    }

    /// All statuses in priority order.
    pub fn statuses(&self) -> &[AgentStatus] {
        &self.statuses
    }

    /// Status of a specific agent.
    pub fn get(&self, agent: AgentId) -> &AgentStatus {
        let idx = AgentId::PRIORITY
            .iter()
            .position(|a| *a == agent)
            .unwrap_or(0);
        &self.statuses[idx]
    }

    /// The agent the canvas treats as currently running.
    pub fn active(&self) -> Option<&AgentStatus> {
        currently_running(&self.statuses)
    }

    /// How many agents report running at the same time.
    ///
    /// Only the first one is shown as active; anything above one means the
    /// runtime is executing agents concurrently.
    pub fn running_count(&self) -> usize {
        self.statuses.iter().filter(|s| s.status).count()
    }
}

impl Default for AgentBoard {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn board(travel: bool, research: bool, mcp: bool) -> AgentBoard {
        let snapshot = |running| AgentSnapshot {
            running,
            ..AgentSnapshot::default()
        };
        let source = StaticSource::new()
            .with(AgentId::Travel, snapshot(travel))
            .with(AgentId::Research, snapshot(research))
            .with(AgentId::Mcp, snapshot(mcp));
        AgentBoard::from_source(&source)
    }

    #[test]
    fn test_reducer_picks_first_running_for_every_combination() {
        for bits in 0u8..8 {
            let flags = [bits & 0b100 != 0, bits & 0b010 != 0, bits & 0b001 != 0];
            let board = board(flags[0], flags[1], flags[2]);

            let expected = AgentId::PRIORITY
                .iter()
                .zip(flags)
                .find(|(_, running)| *running)
                .map(|(agent, _)| *agent);

            assert_eq!(
                board.active().map(|s| s.agent),
                expected,
                "flags {:?}",
                flags
            );
        }
    }

    #[test]
    fn test_reducer_empty_input() {
        assert!(currently_running(&[]).is_none());
    }

    #[test]
    fn test_travel_wins_over_mcp() {
        let board = board(true, false, true);
        assert_eq!(board.active().unwrap().agent, AgentId::Travel);
        assert_eq!(board.running_count(), 2);
    }

    #[test]
    fn test_missing_name_falls_back_to_default() {
        let status = AgentStatus::from_snapshot(AgentId::Mcp, &AgentSnapshot::running(None, None));
        assert_eq!(status.name, "MCP Agent");
        assert_eq!(status.node_name, "");
        assert!(status.status);
    }

    #[test]
    fn test_empty_name_falls_back_to_default() {
        let status = AgentStatus::from_snapshot(
            AgentId::Travel,
            &AgentSnapshot::running(Some(""), Some("plan")),
        );
        assert_eq!(status.name, "Travel Agent");
        assert_eq!(status.node_name, "plan");
    }

    #[test]
    fn test_reported_name_is_kept() {
        let status = AgentStatus::from_snapshot(
            AgentId::Research,
            &AgentSnapshot::running(Some("researcher"), Some("search")),
        );
        assert_eq!(status.name, "researcher");
    }

    #[test]
    fn test_snapshot_accepts_node_name_alias() {
        let snapshot: AgentSnapshot =
            serde_json::from_str(r#"{"running": true, "nodeName": "search"}"#).unwrap();
        assert_eq!(snapshot.node_name.as_deref(), Some("search"));
        assert!(snapshot.name.is_none());
    }

    #[test]
    fn test_agent_id_round_trip() {
        for agent in AgentId::PRIORITY {
            assert_eq!(AgentId::from_id(agent.as_str()), Some(agent));
        }
        assert_eq!(AgentId::from_id("weather"), None);
    }

    #[test]
    fn test_board_get() {
        let board = board(false, true, false);
        assert!(board.get(AgentId::Research).status);
        assert!(!board.get(AgentId::Mcp).status);
        assert_eq!(AgentBoard::idle().running_count(), 0);
    }
}
