//! Chat pane: local transcript and input line.
//!
//! Messages typed here are handed to the caller on submit; delivering them
//! to the agents is the runtime's job, not the canvas's.

use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::theme::Theme;

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    /// Notices from the canvas itself
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Transcript, input buffer and scroll position.
#[derive(Debug, Default)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    input: String,
    scroll: usize,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Move the input into the transcript.
    ///
    /// Returns the submitted text, or `None` for blank input.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.input.trim().to_string();
        self.input.clear();
        if text.is_empty() {
            return None;
        }
        self.push_message(ChatRole::User, text.clone());
        Some(text)
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.push_message(ChatRole::System, text.into());
    }

    fn push_message(&mut self, role: ChatRole, text: String) {
        self.messages.push(ChatMessage {
            role,
            text,
            at: Local::now(),
        });
        self.scroll = 0;
    }

    /// Scroll towards older messages.
    pub fn scroll_up(&mut self) {
        if self.scroll + 1 < self.messages.len() {
            self.scroll += 1;
        }
    }

    /// Scroll towards the newest message.
    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }
}

/// Chat pane widget.
pub struct ChatPanel<'a> {
    state: &'a ChatState,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> ChatPanel<'a> {
    pub fn new(state: &'a ChatState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            focused: false,
        }
    }

    /// Whether the input line has keyboard focus.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn transcript_lines(&self, height: usize) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;

        if self.state.messages.is_empty() {
            return vec![Line::from(Span::styled(
                "Press [i] to start typing.",
                Style::default().fg(colors.text_dim),
            ))];
        }

        let end = self.state.messages.len() - self.state.scroll;
        let start = end.saturating_sub(height.max(1));

        self.state.messages[start..end]
            .iter()
            .map(|msg| {
                let (prefix, style) = match msg.role {
                    ChatRole::User => ("you", Style::default().fg(colors.header)),
                    ChatRole::System => ("canvas", Style::default().fg(colors.text_dim)),
                };
                Line::from(vec![
                    Span::styled(
                        format!("{} ", msg.at.format("%H:%M")),
                        Style::default().fg(colors.text_dim),
                    ),
                    Span::styled(format!("{prefix}> "), style.add_modifier(Modifier::BOLD)),
                    Span::styled(msg.text.clone(), Style::default().fg(colors.text)),
                ])
            })
            .collect()
    }
}

impl Widget for ChatPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let height = chunks[0].height.saturating_sub(2) as usize;
        Paragraph::new(self.transcript_lines(height))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border_dim))
                    .title(Span::styled(" Chat ", Style::default().fg(colors.text))),
            )
            .wrap(Wrap { trim: false })
            .render(chunks[0], buf);

        let (border, cursor) = if self.focused {
            (colors.header, "█")
        } else {
            (colors.border_dim, "")
        };
        Paragraph::new(format!("> {}{}", self.state.input, cursor))
            .style(Style::default().fg(colors.text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(" Input "),
            )
            .render(chunks[1], buf);
    }
}
