//! Agent status sources.
//!
//! The canvas never drives agents; it reads whatever the runtime last
//! reported. [`AgentStatusSource`] is that read-only seam.

use std::collections::HashMap;

use crate::agent::{AgentId, AgentSnapshot};

/// Read access to the latest snapshot of each agent.
pub trait AgentStatusSource {
    /// Current snapshot for `agent`. Unknown agents report idle.
    fn snapshot(&self, agent: AgentId) -> AgentSnapshot;

    /// Pull in pending updates. Returns true if any snapshot changed.
    ///
    /// Sources that read on demand have nothing to pull.
    fn refresh(&mut self) -> bool {
        false
    }
}

/// In-memory source, used by tests and demo mode.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    snapshots: HashMap<AgentId, AgentSnapshot>,
}

impl StaticSource {
    /// Create a source where every agent is idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, agent: AgentId, snapshot: AgentSnapshot) -> Self {
        self.set(agent, snapshot);
        self
    }

    /// Replace an agent's snapshot.
    pub fn set(&mut self, agent: AgentId, snapshot: AgentSnapshot) {
        self.snapshots.insert(agent, snapshot);
    }

    /// Reset an agent to idle.
    pub fn clear(&mut self, agent: AgentId) {
        self.snapshots.remove(&agent);
    }
}

impl AgentStatusSource for StaticSource {
    fn snapshot(&self, agent: AgentId) -> AgentSnapshot {
        self.snapshots.get(&agent).cloned().unwrap_or_default()
    }
}

impl<T: AgentStatusSource + ?Sized> AgentStatusSource for Box<T> {
    fn snapshot(&self, agent: AgentId) -> AgentSnapshot {
        (**self).snapshot(agent)
    }

    fn refresh(&mut self) -> bool {
        (**self).refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_agent_is_idle() {
        let source = StaticSource::new();
        assert_eq!(source.snapshot(AgentId::Travel), AgentSnapshot::idle());
    }

    #[test]
    fn test_set_and_clear() {
        let mut source = StaticSource::new();
        source.set(AgentId::Mcp, AgentSnapshot::running(None, Some("tools")));
        assert!(source.snapshot(AgentId::Mcp).running);

        source.clear(AgentId::Mcp);
        assert!(!source.snapshot(AgentId::Mcp).running);
    }

    #[test]
    fn test_boxed_source() {
        let source: Box<dyn AgentStatusSource> = Box::new(
            StaticSource::new().with(AgentId::Research, AgentSnapshot::running(None, None)),
        );
        assert!(source.snapshot(AgentId::Research).running);
    }
}
