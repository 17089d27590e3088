//! The canvas pane: running banner or idle toolbar, per-agent panels, the
//! default placeholder and the agent debug overlay.
//!
//! Nothing here is stored between frames. [`CanvasOverlay::select`] is
//! re-evaluated on every draw from the current [`AgentBoard`].

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use canvas_core::{AgentBoard, AgentId, AgentStatus};

use crate::theme::Theme;

/// Placeholder shown while no agent is running.
pub const DEFAULT_VIEW_TEXT: &str = "Start a conversation in the chat to begin planning your \
trip, researching topics, or use the MCP agent for other tasks!";

/// Example prompts listed in the debug overlay.
pub const PROMPT_HINT: &str = "Try: \"plan a trip\", \"research AI\", \"calculate 5+5\"";

/// Label on the idle toolbar's badge.
pub const IDLE_BADGE: &str = "Multi-Agent";

/// Label on the idle toolbar's settings button.
pub const SETTINGS_BUTTON: &str = "MCP Servers";

const SETTINGS_BUTTON_PREFIX: &str = " [s] ";

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// What the top-right corner of the canvas shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasOverlay {
    /// An agent is running: show the banner, hide the toolbar
    Running(AgentStatus),
    /// Nothing is running: show the settings button and badge
    Idle,
}

impl CanvasOverlay {
    pub fn select(board: &AgentBoard) -> Self {
        match board.active() {
            Some(agent) => Self::Running(agent.clone()),
            None => Self::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Settings button followed by the badge, right-aligned in the overlay row.
fn toolbar_line(theme: &Theme) -> Line<'static> {
    let colors = &theme.colors;
    let button = Style::default().fg(colors.text).bg(colors.idle_bg);
    Line::from(vec![
        Span::styled(SETTINGS_BUTTON_PREFIX, button.fg(colors.hotkey)),
        Span::styled(format!("{SETTINGS_BUTTON} "), button),
        Span::raw(" "),
        Span::styled(
            format!(" {IDLE_BADGE} "),
            button.add_modifier(Modifier::BOLD),
        ),
    ])
}

/// Banner text for a running agent.
pub fn banner_text(agent: &AgentStatus) -> String {
    format!("{} agent executing {} node", agent.name, agent.node_name)
}

/// Whole canvas pane.
pub struct CanvasPanel<'a> {
    board: &'a AgentBoard,
    theme: &'a Theme,
    show_debug: bool,
    tick: usize,
}

impl<'a> CanvasPanel<'a> {
    pub fn new(board: &'a AgentBoard, theme: &'a Theme) -> Self {
        Self {
            board,
            theme,
            show_debug: false,
            tick: 0,
        }
    }

    /// Show the agent debug overlay.
    pub fn show_debug(mut self, show: bool) -> Self {
        self.show_debug = show;
        self
    }

    /// Animation frame counter for the banner spinner.
    pub fn tick(mut self, tick: usize) -> Self {
        self.tick = tick;
        self
    }

    fn render_overlay(&self, overlay: &CanvasOverlay, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let line = match overlay {
            CanvasOverlay::Running(agent) => Line::from(Span::styled(
                format!(
                    " {} {} ",
                    SPINNER[self.tick % SPINNER.len()],
                    banner_text(agent)
                ),
                Style::default()
                    .fg(colors.running_fg)
                    .bg(colors.running_bg)
                    .add_modifier(Modifier::BOLD),
            )),
            CanvasOverlay::Idle => toolbar_line(self.theme),
        };

        Paragraph::new(line)
            .alignment(Alignment::Right)
            .render(area, buf);
    }

    /// Screen area of the idle toolbar's settings button when the panel is
    /// drawn into `area`. `None` while an agent is running.
    pub fn settings_button_area(&self, area: Rect) -> Option<Rect> {
        if !CanvasOverlay::select(self.board).is_idle() {
            return None;
        }
        let inner = Self::block(self.theme).inner(area);
        if inner.height == 0 {
            return None;
        }

        let line_width = toolbar_line(self.theme).width() as u16;
        let button_width = (SETTINGS_BUTTON_PREFIX.len() + SETTINGS_BUTTON.len() + 1) as u16;
        let x = inner.x + inner.width.saturating_sub(line_width);
        let width = button_width.min(inner.x + inner.width - x);
        Some(Rect::new(x, inner.y, width, 1))
    }

    fn block(theme: &Theme) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.colors.border_dim))
            .title(Span::styled(" Canvas ", Style::default().fg(theme.colors.text)))
    }

    fn render_agents(&self, overlay: &CanvasOverlay, area: Rect, buf: &mut Buffer) {
        let panels: Vec<AgentPanel<'_>> = self
            .board
            .statuses()
            .iter()
            .map(|status| AgentPanel::new(status, self.theme))
            .filter(AgentPanel::is_visible)
            .collect();

        if panels.is_empty() && overlay.is_idle() {
            DefaultView::new(self.theme).render(area, buf);
            return;
        }

        let constraints: Vec<Constraint> = panels.iter().map(|_| Constraint::Length(5)).collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (panel, row) in panels.into_iter().zip(rows.iter()) {
            panel.render(*row, buf);
        }
    }
}

impl Widget for CanvasPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Self::block(self.theme);
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let overlay = CanvasOverlay::select(self.board);
        self.render_overlay(&overlay, chunks[0], buf);
        self.render_agents(&overlay, chunks[1], buf);

        if self.show_debug {
            let debug = DebugPanel::new(self.board, self.theme);
            let debug_area = debug.area(chunks[1]);
            debug.render(debug_area, buf);
        }
    }
}

/// Content for one agent. Renders nothing while its agent is idle.
pub struct AgentPanel<'a> {
    status: &'a AgentStatus,
    theme: &'a Theme,
}

impl<'a> AgentPanel<'a> {
    pub fn new(status: &'a AgentStatus, theme: &'a Theme) -> Self {
        Self { status, theme }
    }

    pub fn is_visible(&self) -> bool {
        self.status.status
    }

    fn activity(&self) -> &'static str {
        match self.status.agent {
            AgentId::Travel => "Planning your trip",
            AgentId::Research => "Researching your topic",
            AgentId::Mcp => "Working with MCP tools",
        }
    }
}

impl Widget for AgentPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.is_visible() {
            return;
        }
        let colors = &self.theme.colors;

        let node = if self.status.node_name.is_empty() {
            "starting...".to_string()
        } else {
            self.status.node_name.clone()
        };

        let lines = vec![
            Line::from(Span::styled(self.activity(), Style::default().fg(colors.text))),
            Line::from(vec![
                Span::styled("Node: ", Style::default().fg(colors.text_dim)),
                Span::styled(node, Style::default().fg(colors.running_fg)),
            ]),
        ];

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.header))
                    .title(Span::styled(
                        format!(" {} ", self.status.name),
                        Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
                    )),
            )
            .render(area, buf);
    }
}

/// Placeholder message for an idle canvas.
pub struct DefaultView<'a> {
    theme: &'a Theme,
}

impl<'a> DefaultView<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for DefaultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let top_padding = area.height.saturating_sub(4) / 2;

        let mut lines: Vec<Line<'_>> = (0..top_padding).map(|_| Line::from("")).collect();
        lines.push(Line::from(Span::styled(
            "Agent Canvas",
            Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            DEFAULT_VIEW_TEXT,
            Style::default().fg(colors.text_dim).add_modifier(Modifier::ITALIC),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// Overlay listing every agent's state, including ones hidden by priority.
pub struct DebugPanel<'a> {
    board: &'a AgentBoard,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(board: &'a AgentBoard, theme: &'a Theme) -> Self {
        Self { board, theme }
    }

    /// One line per agent: `"{name}: ACTIVE ({node})"` or `"{name}: idle"`.
    pub fn status_line(status: &AgentStatus) -> String {
        if status.status {
            format!("{}: ACTIVE ({})", status.name, status.node_name)
        } else {
            format!("{}: idle", status.name)
        }
    }

    /// Top-right corner of `area`, sized to the content.
    pub fn area(&self, area: Rect) -> Rect {
        let extra = u16::from(self.board.running_count() > 1);
        let width = 44.min(area.width);
        let height = (self.board.statuses().len() as u16 + 4 + extra).min(area.height);
        Rect::new(area.x + area.width - width, area.y, width, height)
    }
}

impl Widget for DebugPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut lines: Vec<Line<'_>> = self
            .board
            .statuses()
            .iter()
            .map(|status| {
                let (marker, style) = if status.status {
                    ("● ", Style::default().fg(colors.running_fg))
                } else {
                    ("○ ", Style::default().fg(colors.text_dim))
                };
                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(Self::status_line(status), style),
                ])
            })
            .collect();

        let running = self.board.running_count();
        if running > 1 {
            if let Some(active) = self.board.active() {
                lines.push(Line::from(Span::styled(
                    format!("{running} agents running, showing {}", active.name),
                    Style::default().fg(colors.hotkey),
                )));
            }
        }

        lines.push(Line::from(Span::styled(
            PROMPT_HINT,
            Style::default().fg(colors.header),
        )));

        Clear.render(area, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.border_dim))
                    .title(Span::styled(
                        " Agent Status ",
                        Style::default()
                            .fg(colors.debug_heading)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(colors.overlay_bg)),
            )
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
