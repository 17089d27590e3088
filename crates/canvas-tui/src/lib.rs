//! Terminal UI for agent-canvas.
//!
//! Ratatui-based split view: a chat pane on the left and a canvas on the
//! right showing which agent is running.
//!
//! ## Features
//!
//! - Running banner naming the active agent and its current node
//! - Idle toolbar with the MCP settings dialog and the "Multi-Agent" badge
//! - Per-agent panels and a debug overlay listing every agent's state
//! - Local chat transcript
//!
//! ## Hotkeys
//!
//! - `s` - MCP server settings
//! - `Esc` - Close dialog / leave chat
//! - `i` or `:` - Chat input
//! - `Enter` - Send chat message
//! - `d` - Toggle debug panel
//! - `t` - Cycle theme
//! - `q` - Quit
//! - `Ctrl+C` - Force quit

pub mod app;
pub mod canvas;
pub mod chat;
pub mod event;
pub mod modal;
pub mod theme;

pub use app::{App, AppResult};
pub use canvas::{CanvasOverlay, CanvasPanel, banner_text};
pub use event::{AppEvent, InputMode};
pub use modal::{McpConfigModal, ModalToggle};
pub use theme::{Theme, ThemeName};
