//! Keyboard handling for the canvas.
//!
//! Keys mean different things depending on what has focus: the canvas
//! itself, the chat input line, or the settings dialog.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Hotkeys act on the canvas
    #[default]
    Normal,
    /// Keystrokes edit the chat input
    Chat,
    /// Settings dialog is open
    Modal,
}

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Open the MCP settings dialog
    OpenSettings,
    /// Close the MCP settings dialog
    CloseSettings,
    /// Move focus to the chat input
    FocusChat,
    /// Leave the chat input, keeping its contents
    LeaveChat,
    /// Show or hide the agent debug overlay
    ToggleDebug,
    /// Switch to the next color theme
    CycleTheme,
    /// Scroll the chat transcript back
    ScrollUp,
    /// Scroll the chat transcript forward
    ScrollDown,
    /// Text input character
    TextInput(char),
    /// Backspace in text input
    Backspace,
    /// Submit text input
    Submit,
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// No action needed
    None,
}

/// Convert a key event to an app event for the given mode.
pub fn map_key(key: KeyEvent, mode: InputMode) -> AppEvent {
    // Ctrl+C always force quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return AppEvent::ForceQuit;
    }

    match mode {
        InputMode::Modal => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('s') => {
                AppEvent::CloseSettings
            }
            _ => AppEvent::None,
        },
        InputMode::Chat => match key.code {
            KeyCode::Esc => AppEvent::LeaveChat,
            KeyCode::Enter => AppEvent::Submit,
            KeyCode::Backspace => AppEvent::Backspace,
            KeyCode::Up => AppEvent::ScrollUp,
            KeyCode::Down => AppEvent::ScrollDown,
            KeyCode::Char(c) => AppEvent::TextInput(c),
            _ => AppEvent::None,
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            KeyCode::Char('s') | KeyCode::Char('S') => AppEvent::OpenSettings,
            KeyCode::Char('i') | KeyCode::Char(':') => AppEvent::FocusChat,
            KeyCode::Char('d') | KeyCode::Char('D') => AppEvent::ToggleDebug,
            KeyCode::Char('t') | KeyCode::Char('T') => AppEvent::CycleTheme,
            KeyCode::Up | KeyCode::Char('k') => AppEvent::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => AppEvent::ScrollDown,
            _ => AppEvent::None,
        },
    }
}
