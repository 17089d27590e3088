//! Debounced watcher over the agent status directory.
//!
//! This is the subscription side of the canvas: the agent runtime rewrites
//! status files as agents move between nodes, the watcher turns those writes
//! into [`AgentEvent`]s, and the UI thread drains them with
//! [`StatusWatcher::poll`] before each frame.
//!
//! ## Architecture
//!
//! 1. Watches the status directory (non-recursive) with `notify`
//! 2. Debounces rapid rewrites (50ms default)
//! 3. Parses the changed file on the notify thread
//! 4. Sends the result over an mpsc channel; only the UI thread mutates state

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{
    DebounceEventResult, DebouncedEvent, Debouncer, RecommendedCache, new_debouncer,
};
use tracing::{debug, error, info, warn};

use crate::agent::{AgentId, AgentSnapshot};
use crate::error::{CanvasError, Result};
use crate::source::AgentStatusSource;
use crate::status::{agent_for_path, parse_status_file, status_file_path};

/// Default debounce timeout in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Events delivered by the watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// An agent's status file was created or rewritten
    Updated {
        agent: AgentId,
        snapshot: AgentSnapshot,
    },

    /// An agent's status file was deleted
    Removed { agent: AgentId },

    /// Initial scan finished with every readable status file
    InitialScanComplete {
        snapshots: HashMap<AgentId, AgentSnapshot>,
    },

    /// A status file could not be read or parsed
    Error {
        agent: Option<AgentId>,
        path: PathBuf,
        error: String,
    },
}

/// Configuration for the status watcher.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Directory holding one JSON file per agent
    pub status_dir: PathBuf,

    /// Debounce timeout in milliseconds
    pub debounce_ms: u64,

    /// Whether to create the status directory if it doesn't exist
    pub create_dir_if_missing: bool,
}

impl WatcherConfig {
    /// Watch `status_dir` with default settings.
    pub fn new(status_dir: impl Into<PathBuf>) -> Self {
        Self {
            status_dir: status_dir.into(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            create_dir_if_missing: true,
        }
    }

    /// Set the debounce timeout.
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Fail instead of creating a missing directory.
    pub fn require_existing_dir(mut self) -> Self {
        self.create_dir_if_missing = false;
        self
    }
}

/// Watcher for agent status files.
pub struct StatusWatcher {
    config: WatcherConfig,
    _debouncer: Debouncer<notify::RecommendedWatcher, RecommendedCache>,
    event_rx: Receiver<AgentEvent>,
    snapshots: HashMap<AgentId, AgentSnapshot>,
}

impl StatusWatcher {
    /// Start watching. Existing files are loaded before this returns.
    pub fn new(config: WatcherConfig) -> Result<Self> {
        // The debouncer ticks every timeout / 4; zero would busy-loop its thread
        if config.debounce_ms == 0 {
            return Err(CanvasError::WatcherInit {
                message: "debounce timeout must be at least 1ms".to_string(),
            });
        }

        if !config.status_dir.exists() {
            if config.create_dir_if_missing {
                std::fs::create_dir_all(&config.status_dir).map_err(|e| {
                    CanvasError::DirectoryCreation {
                        path: config.status_dir.clone(),
                        source: e,
                    }
                })?;
                info!(path = ?config.status_dir, "Created status directory");
            } else {
                return Err(CanvasError::WatcherInit {
                    message: format!(
                        "status directory does not exist: {}",
                        config.status_dir.display()
                    ),
                });
            }
        }

        let (event_tx, event_rx) = mpsc::channel();

        let status_dir = config.status_dir.clone();
        let tx_clone = event_tx.clone();

        let debouncer = new_debouncer(
            Duration::from_millis(config.debounce_ms),
            None,
            move |result: DebounceEventResult| {
                Self::handle_debounced_events(result, &status_dir, &tx_clone);
            },
        )
        .map_err(|e| CanvasError::WatcherInit {
            message: e.to_string(),
        })?;

        let mut watcher = Self {
            config,
            _debouncer: debouncer,
            event_rx,
            snapshots: HashMap::new(),
        };

        watcher.start_watching()?;
        watcher.initial_scan(event_tx);

        Ok(watcher)
    }

    /// Directory being watched.
    pub fn status_dir(&self) -> &Path {
        &self.config.status_dir
    }

    fn start_watching(&mut self) -> Result<()> {
        self._debouncer
            .watch(&self.config.status_dir, RecursiveMode::NonRecursive)
            .map_err(|e| CanvasError::WatcherInit {
                message: e.to_string(),
            })?;
        info!(path = ?self.config.status_dir, "Started watching status directory");
        Ok(())
    }

    fn initial_scan(&mut self, event_tx: Sender<AgentEvent>) {
        let mut snapshots = HashMap::new();

        for agent in AgentId::PRIORITY {
            let path = status_file_path(&self.config.status_dir, agent);
            if !path.exists() {
                continue;
            }
            match parse_status_file(&path) {
                Ok(snapshot) => {
                    debug!(agent = %agent, running = snapshot.running, "Found existing agent status");
                    snapshots.insert(agent, snapshot);
                }
                Err(e) => {
                    warn!(path = ?path, error = %e, "Failed to parse existing status file");
                }
            }
        }

        self.snapshots = snapshots.clone();

        let _ = event_tx.send(AgentEvent::InitialScanComplete { snapshots });
    }

    fn handle_debounced_events(
        result: DebounceEventResult,
        status_dir: &Path,
        event_tx: &Sender<AgentEvent>,
    ) {
        match result {
            Ok(events) => {
                for event in events {
                    Self::process_event(event, status_dir, event_tx);
                }
            }
            Err(errors) => {
                for error in errors {
                    error!(error = %error, "File watcher error");
                }
            }
        }
    }

    fn process_event(event: DebouncedEvent, status_dir: &Path, event_tx: &Sender<AgentEvent>) {
        use notify::EventKind;

        for path in &event.paths {
            if path.parent() != Some(status_dir) {
                continue;
            }

            // Files for agents the canvas doesn't know about are ignored
            let Some(agent) = agent_for_path(path) else {
                continue;
            };

            match event.kind {
                EventKind::Create(_) | EventKind::Modify(_) => match parse_status_file(path) {
                    Ok(snapshot) => {
                        debug!(
                            agent = %agent,
                            running = snapshot.running,
                            node = snapshot.node_name.as_deref().unwrap_or(""),
                            "Agent status updated"
                        );
                        let _ = event_tx.send(AgentEvent::Updated { agent, snapshot });
                    }
                    Err(e) => {
                        warn!(path = ?path, error = %e, "Failed to parse status file");
                        let _ = event_tx.send(AgentEvent::Error {
                            agent: Some(agent),
                            path: path.clone(),
                            error: e.to_string(),
                        });
                    }
                },
                EventKind::Remove(_) => {
                    debug!(agent = %agent, "Agent status file removed");
                    let _ = event_tx.send(AgentEvent::Removed { agent });
                }
                _ => {}
            }
        }
    }

    /// Try to receive one event without blocking.
    pub fn try_recv(&mut self) -> Option<AgentEvent> {
        match self.event_rx.try_recv() {
            Ok(event) => {
                self.apply_event(&event);
                Some(event)
            }
            Err(_) => None,
        }
    }

    /// Drain all pending events. Returns true if any agent's state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Some(event) = self.try_recv() {
            changed |= !matches!(event, AgentEvent::InitialScanComplete { .. });
        }
        changed
    }

    /// Apply an event to the snapshot map.
    pub fn apply_event(&mut self, event: &AgentEvent) {
        match event {
            AgentEvent::Updated { agent, snapshot } => {
                self.snapshots.insert(*agent, snapshot.clone());
            }
            AgentEvent::Removed { agent } => {
                self.snapshots.remove(agent);
            }
            AgentEvent::InitialScanComplete { snapshots } => {
                self.snapshots = snapshots.clone();
            }
            AgentEvent::Error { agent, .. } => {
                // An unreadable file can't claim the agent is running
                if let Some(agent) = agent {
                    self.snapshots.remove(agent);
                }
            }
        }
    }

    /// Latest known snapshots.
    pub fn snapshots(&self) -> &HashMap<AgentId, AgentSnapshot> {
        &self.snapshots
    }
}

impl AgentStatusSource for StatusWatcher {
    fn snapshot(&self, agent: AgentId) -> AgentSnapshot {
        self.snapshots.get(&agent).cloned().unwrap_or_default()
    }

    fn refresh(&mut self) -> bool {
        self.poll()
    }
}
