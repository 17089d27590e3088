//! Settings dialog: the visibility toggle and the MCP server list it shows.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use canvas_core::McpServerConfig;

use crate::theme::Theme;

/// Visibility flag for the settings dialog.
///
/// Both directions are idempotent. Only [`ModalToggle::close`] hides it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalToggle {
    visible: bool,
}

impl ModalToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }
}

/// Dialog listing the MCP servers the agent is configured with.
///
/// Read-only. Server configuration belongs to the agent runtime; the dialog
/// only shows what the config file declares.
pub struct McpConfigModal<'a> {
    servers: &'a [McpServerConfig],
    theme: &'a Theme,
}

impl<'a> McpConfigModal<'a> {
    pub fn new(servers: &'a [McpServerConfig], theme: &'a Theme) -> Self {
        Self { servers, theme }
    }

    /// Centered area for the dialog inside `area`.
    pub fn area(area: Rect) -> Rect {
        let width = 70.min(area.width.saturating_sub(4));
        let height = (8 + 2 * 6).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect::new(x, y, width, height)
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = Vec::new();

        if self.servers.is_empty() {
            lines.push(Line::from(Span::styled(
                "No MCP servers configured.",
                Style::default().fg(colors.text),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Add entries under `mcp_servers:` in ~/.agent-canvas/config.yaml",
                Style::default().fg(colors.text_dim),
            )));
        } else {
            for server in self.servers {
                lines.push(Line::from(vec![
                    Span::styled(
                        server.name.clone(),
                        Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  ({})", server.transport),
                        Style::default().fg(colors.text_dim),
                    ),
                ]));
                lines.push(Line::from(Span::styled(
                    format!("  {}", server.endpoint()),
                    Style::default().fg(colors.text),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("[Esc]", Style::default().fg(colors.hotkey)),
            Span::styled(" Close", Style::default().fg(colors.text_dim)),
        ]));
        lines
    }
}

impl Widget for McpConfigModal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let dialog = Self::area(area);

        Clear.render(dialog, buf);

        let title = format!(" MCP Servers ({}) ", self.servers.len());
        Paragraph::new(self.lines())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(colors.header))
                    .title(Span::styled(
                        title,
                        Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(colors.overlay_bg)),
            )
            .wrap(Wrap { trim: false })
            .render(dialog, buf);
    }
}
