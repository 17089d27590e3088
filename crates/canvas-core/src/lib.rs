//! # canvas-core
//!
//! Core types, status sources, and utilities for agent-canvas.
//!
//! This crate provides:
//! - [`agent`] - Agent status model and the active-agent reducer
//! - [`source`] - The [`AgentStatusSource`] seam and an in-memory source
//! - [`status`] - Reading agent status files
//! - [`watcher`] - Debounced watching of the status directory
//! - [`config`] - YAML configuration
//! - [`CanvasError`] - Error types
//! - [`logging`] - Tracing setup
//!
//! ## Example
//!
//! ```no_run
//! use canvas_core::{AgentBoard, CanvasConfig, StatusWatcher, WatcherConfig};
//!
//! fn main() -> canvas_core::Result<()> {
//!     let _guard = canvas_core::init_logging(None, false)?;
//!     let config = CanvasConfig::load()?;
//!
//!     let mut watcher = StatusWatcher::new(WatcherConfig::new(config.resolved_status_dir()?))?;
//!     watcher.poll();
//!
//!     match AgentBoard::from_source(&watcher).active() {
//!         Some(agent) => println!("{} agent executing {} node", agent.name, agent.node_name),
//!         None => println!("no agent running"),
//!     }
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod logging;
pub mod source;
pub mod status;
pub mod watcher;

pub use agent::{AgentBoard, AgentId, AgentSnapshot, AgentStatus, currently_running};
pub use config::{CanvasConfig, McpServerConfig, McpTransport};
pub use error::{CanvasError, Result};
pub use logging::{LogGuard, init_logging};
pub use source::{AgentStatusSource, StaticSource};
pub use status::StatusReader;
pub use watcher::{AgentEvent, StatusWatcher, WatcherConfig};
