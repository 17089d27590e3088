//! Main application state and loop for the canvas TUI.
//!
//! The `App` owns the status source, the chat state and the settings dialog
//! toggle. The agent board is rebuilt from the source on every draw, so the
//! banner/toolbar switch always reflects the latest snapshots.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info};

use canvas_core::{AgentBoard, AgentStatusSource, CanvasConfig, CanvasError, McpServerConfig};

use crate::canvas::CanvasPanel;
use crate::chat::{ChatPanel, ChatState};
use crate::event::{AppEvent, InputMode, map_key};
use crate::modal::{McpConfigModal, ModalToggle};
use crate::theme::Theme;

/// Result type for app operations.
pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Target frame rate (30 FPS is plenty for a status view).
const TARGET_FPS: u64 = 30;
const FRAME_DURATION: Duration = Duration::from_millis(1000 / TARGET_FPS);

/// How often the status source is asked for pending updates.
const DATA_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Redraw at least this often (header clock, spinner, on-demand sources).
const MIN_REDRAW_INTERVAL: Duration = Duration::from_millis(250);

/// Below this width the canvas stacks above the chat.
const SPLIT_MIN_WIDTH: u16 = 80;

/// Main application state.
pub struct App {
    source: Box<dyn AgentStatusSource>,
    mcp_servers: Vec<McpServerConfig>,
    theme: Theme,
    modal: ModalToggle,
    chat: ChatState,
    chat_focused: bool,
    show_debug: bool,
    should_quit: bool,
    dirty: bool,
    tick: usize,
    /// Where the idle toolbar's settings button was last drawn
    settings_button: Option<Rect>,
    last_poll_time: Instant,
    last_draw_time: Instant,
}

impl App {
    /// Create an app reading agent state from `source`.
    pub fn new(source: Box<dyn AgentStatusSource>, config: &CanvasConfig) -> Self {
        let now = Instant::now();
        Self {
            source,
            mcp_servers: config.mcp_servers.clone(),
            theme: Theme::from_config(&config.theme),
            modal: ModalToggle::new(),
            chat: ChatState::new(),
            chat_focused: false,
            show_debug: config.show_debug_panel,
            should_quit: false,
            dirty: true,
            tick: 0,
            settings_button: None,
            last_poll_time: now,
            last_draw_time: now,
        }
    }

    /// Current board, rebuilt from the source.
    pub fn board(&self) -> AgentBoard {
        AgentBoard::from_source(self.source.as_ref())
    }

    pub fn modal(&self) -> &ModalToggle {
        &self.modal
    }

    pub fn chat(&self) -> &ChatState {
        &self.chat
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Show a notice from the canvas itself in the chat transcript.
    pub fn notify(&mut self, text: impl Into<String>) {
        self.chat.push_system(text);
        self.mark_dirty();
    }

    /// Where keystrokes currently go.
    pub fn input_mode(&self) -> InputMode {
        if self.modal.is_open() {
            InputMode::Modal
        } else if self.chat_focused {
            InputMode::Chat
        } else {
            InputMode::Normal
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let event = map_key(key, self.input_mode());
        self.handle_app_event(event);
    }

    /// Handle a mouse event. A left click on the idle toolbar's settings
    /// button opens the settings dialog.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || self.modal.is_open() {
            return;
        }
        let clicked = Position::new(mouse.column, mouse.row);
        if self.settings_button.is_some_and(|button| button.contains(clicked)) {
            self.handle_app_event(AppEvent::OpenSettings);
        }
    }

    /// Handle an application event.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::OpenSettings => {
                self.modal.open();
                debug!("settings dialog opened");
            }
            AppEvent::CloseSettings => {
                self.modal.close();
                debug!("settings dialog closed");
            }
            AppEvent::FocusChat => self.chat_focused = true,
            AppEvent::LeaveChat => self.chat_focused = false,
            AppEvent::ToggleDebug => self.show_debug = !self.show_debug,
            AppEvent::CycleTheme => {
                self.theme = Theme::by_name(self.theme.name.next());
                info!(theme = self.theme.name.display_name(), "theme changed");
            }
            AppEvent::ScrollUp => self.chat.scroll_up(),
            AppEvent::ScrollDown => self.chat.scroll_down(),
            AppEvent::TextInput(c) => self.chat.push_char(c),
            AppEvent::Backspace => self.chat.backspace(),
            AppEvent::Submit => {
                if let Some(text) = self.chat.submit() {
                    info!(chars = text.len(), "chat message submitted");
                }
            }
            AppEvent::Quit | AppEvent::ForceQuit => self.should_quit = true,
            AppEvent::None => return,
        }
        self.mark_dirty();
    }

    /// Run the main application loop.
    pub fn run(&mut self) -> AppResult<()> {
        let terminal_init = |e: io::Error| CanvasError::TerminalInit {
            message: e.to_string(),
        };

        crossterm::terminal::enable_raw_mode().map_err(terminal_init)?;
        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::terminal::EnterAlternateScreen,
            crossterm::event::EnableMouseCapture
        )
        .map_err(terminal_init)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(terminal_init)?;

        let result = self.run_loop(&mut terminal);

        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> AppResult<()> {
        while !self.should_quit {
            let frame_start = Instant::now();

            if self.last_poll_time.elapsed() >= DATA_POLL_INTERVAL {
                if self.source.refresh() {
                    self.mark_dirty();
                }
                self.last_poll_time = Instant::now();
            }

            if self.take_dirty() || self.last_draw_time.elapsed() >= MIN_REDRAW_INTERVAL {
                self.tick = self.tick.wrapping_add(1);
                terminal.draw(|frame| self.draw(frame))?;
                self.last_draw_time = Instant::now();
            }

            let timeout = FRAME_DURATION.saturating_sub(frame_start.elapsed());
            if event::poll(timeout.max(Duration::from_millis(1)))? {
                match event::read()? {
                    Event::Key(key) => self.handle_key_event(key),
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    Event::Resize(..) => self.mark_dirty(),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let board = self.board();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // Panes
                Constraint::Length(2), // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0], &board);
        let canvas_area = self.draw_panes(frame, chunks[1], &board);
        self.settings_button =
            CanvasPanel::new(&board, &self.theme).settings_button_area(canvas_area);
        self.draw_footer(frame, chunks[2]);

        if self.modal.is_open() {
            frame.render_widget(McpConfigModal::new(&self.mcp_servers, &self.theme), area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, board: &AgentBoard) {
        let colors = &self.theme.colors;
        let title = " Agent Canvas ";
        let now = chrono::Local::now().format("%H:%M:%S").to_string();

        let (status_text, status_style) = match board.active() {
            Some(agent) => (
                format!("[{} running]", agent.name),
                Style::default().fg(colors.running_bg),
            ),
            None => ("[idle]".to_string(), Style::default().fg(colors.text_dim)),
        };

        let right_len = now.len() + 2 + status_text.len();
        let spacing = area
            .width
            .saturating_sub(title.len() as u16 + right_len as u16 + 2) as usize;

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                title,
                Style::default().fg(colors.header).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(spacing)),
            Span::styled(now, Style::default().fg(colors.text_dim)),
            Span::raw("  "),
            Span::styled(status_text, status_style),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border_dim)),
        );

        frame.render_widget(header, area);
    }

    /// Chat on the left third, canvas on the right. Narrow terminals stack
    /// the canvas above the chat.
    fn draw_panes(&self, frame: &mut Frame, area: Rect, board: &AgentBoard) -> Rect {
        let (direction, constraints, canvas_idx, chat_idx) = if area.width >= SPLIT_MIN_WIDTH {
            (
                Direction::Horizontal,
                [Constraint::Percentage(33), Constraint::Percentage(67)],
                1,
                0,
            )
        } else {
            (
                Direction::Vertical,
                [Constraint::Percentage(60), Constraint::Percentage(40)],
                0,
                1,
            )
        };

        let panes = Layout::default()
            .direction(direction)
            .constraints(constraints)
            .split(area);

        frame.render_widget(
            ChatPanel::new(&self.chat, &self.theme).focused(self.chat_focused),
            panes[chat_idx],
        );
        frame.render_widget(
            CanvasPanel::new(board, &self.theme)
                .show_debug(self.show_debug)
                .tick(self.tick),
            panes[canvas_idx],
        );
        panes[canvas_idx]
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let colors = &self.theme.colors;
        let hotkey_style = Style::default().fg(colors.hotkey);

        let hints = match self.input_mode() {
            InputMode::Modal => vec![Span::styled("[Esc]", hotkey_style), Span::raw("Close ")],
            InputMode::Chat => vec![
                Span::styled("[Enter]", hotkey_style),
                Span::raw("Send "),
                Span::styled("[Esc]", hotkey_style),
                Span::raw("Leave chat "),
            ],
            InputMode::Normal => vec![
                Span::styled("[i]", hotkey_style),
                Span::raw("Chat "),
                Span::styled("[s]", hotkey_style),
                Span::raw("MCP Servers "),
                Span::styled("[d]", hotkey_style),
                Span::raw("Debug "),
                Span::styled("[t]", hotkey_style),
                Span::raw("Theme "),
                Span::styled("[q]", hotkey_style),
                Span::raw("Quit"),
            ],
        };

        let footer = Paragraph::new(Line::from(hints))
            .style(Style::default().fg(colors.text_dim))
            .block(Block::default().borders(Borders::TOP));

        frame.render_widget(footer, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::{AgentId, AgentSnapshot, McpTransport, StaticSource};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    /// Helper to render app and get the buffer
    fn render_app(app: &mut App, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Convert buffer to string for searching
    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut result = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                result.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            result.push('\n');
        }
        result
    }

    fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
        buffer_to_string(buffer).contains(text)
    }

    fn quiet_config() -> CanvasConfig {
        CanvasConfig {
            show_debug_panel: false,
            ..CanvasConfig::default()
        }
    }

    fn app_with(source: StaticSource) -> App {
        App::new(Box::new(source), &quiet_config())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse_event(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    #[test]
    fn test_idle_renders_toolbar_and_placeholder() {
        let mut app = app_with(StaticSource::new());
        let buffer = render_app(&mut app, 140, 30);

        assert!(buffer_contains(&buffer, "Multi-Agent"));
        assert!(buffer_contains(&buffer, "[s] MCP Servers"));
        assert!(buffer_contains(&buffer, "Start a conversation"));
        assert!(buffer_contains(&buffer, "[idle]"));
    }

    #[test]
    fn test_running_agent_replaces_toolbar_with_banner() {
        let source = StaticSource::new()
            .with(AgentId::Research, AgentSnapshot::running(None, Some("search")));
        let mut app = app_with(source);
        let buffer = render_app(&mut app, 140, 30);

        assert!(buffer_contains(&buffer, "Research Agent agent executing search node"));
        assert!(buffer_contains(&buffer, "[Research Agent running]"));
        assert!(!buffer_contains(&buffer, "Multi-Agent"));
        assert!(!buffer_contains(&buffer, "Start a conversation"));
    }

    #[test]
    fn test_priority_order_in_banner() {
        let source = StaticSource::new()
            .with(AgentId::Travel, AgentSnapshot::running(None, Some("plan")))
            .with(AgentId::Mcp, AgentSnapshot::running(None, Some("tools")));
        let app = app_with(source);

        assert_eq!(app.board().active().unwrap().agent, AgentId::Travel);
    }

    #[test]
    fn test_settings_dialog_open_and_close() {
        let config = CanvasConfig {
            show_debug_panel: false,
            mcp_servers: vec![McpServerConfig {
                name: "math".to_string(),
                transport: McpTransport::Stdio,
                command: Some("python".to_string()),
                args: vec!["math_server.py".to_string()],
                url: None,
            }],
            ..CanvasConfig::default()
        };
        let mut app = App::new(Box::new(StaticSource::new()), &config);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.modal().is_open());
        assert_eq!(app.input_mode(), InputMode::Modal);
        let buffer = render_app(&mut app, 140, 30);
        assert!(buffer_contains(&buffer, "MCP Servers (1)"));
        assert!(buffer_contains(&buffer, "python math_server.py"));

        press(&mut app, KeyCode::Esc);
        assert!(!app.modal().is_open());
        let buffer = render_app(&mut app, 140, 30);
        assert!(!buffer_contains(&buffer, "MCP Servers (1)"));

        // Closing again is a no-op
        app.handle_app_event(AppEvent::CloseSettings);
        assert!(!app.modal().is_open());
    }

    #[test]
    fn test_clicking_settings_button_opens_dialog() {
        let mut app = app_with(StaticSource::new());
        let buffer = render_app(&mut app, 140, 30);

        let button = app.settings_button.unwrap();
        let label: String = (button.x..button.x + button.width)
            .map(|x| buffer[(x, button.y)].symbol())
            .collect();
        assert_eq!(label, " [s] MCP Servers ");

        // Clicks elsewhere do nothing
        click(&mut app, 0, 0);
        assert!(!app.modal().is_open());

        click(&mut app, button.x + 2, button.y);
        assert!(app.modal().is_open());
    }

    #[test]
    fn test_no_clickable_button_while_agent_runs() {
        let source =
            StaticSource::new().with(AgentId::Travel, AgentSnapshot::running(None, Some("plan")));
        let mut app = app_with(source);
        render_app(&mut app, 140, 30);

        assert!(app.settings_button.is_none());
        click(&mut app, 139, 4);
        assert!(!app.modal().is_open());
    }

    #[test]
    fn test_notify_shows_in_chat() {
        let mut app = app_with(StaticSource::new());
        app.notify("Status watcher unavailable");

        let buffer = render_app(&mut app, 140, 30);
        assert!(buffer_contains(&buffer, "canvas> Status watcher unavailable"));
    }

    #[test]
    fn test_chat_input_flow() {
        let mut app = app_with(StaticSource::new());

        press(&mut app, KeyCode::Char('i'));
        assert_eq!(app.input_mode(), InputMode::Chat);

        for c in "plan a trip".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        // 's' and 'q' were typed, not interpreted as hotkeys
        assert!(!app.modal().is_open());
        assert!(!app.should_quit());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.chat().messages().len(), 1);
        assert_eq!(app.chat().messages()[0].text, "plan a trip");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode(), InputMode::Normal);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_debug_panel_toggle() {
        let mut app = App::new(Box::new(StaticSource::new()), &CanvasConfig::default());
        assert!(app.show_debug());
        let buffer = render_app(&mut app, 140, 30);
        assert!(buffer_contains(&buffer, "Travel Agent: idle"));

        press(&mut app, KeyCode::Char('d'));
        assert!(!app.show_debug());
        let buffer = render_app(&mut app, 140, 30);
        assert!(!buffer_contains(&buffer, "Travel Agent: idle"));
    }

    #[test]
    fn test_theme_cycles_from_config() {
        let config = CanvasConfig {
            theme: "dark".to_string(),
            ..quiet_config()
        };
        let mut app = App::new(Box::new(StaticSource::new()), &config);
        assert_eq!(app.theme().name, crate::theme::ThemeName::Dark);

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme().name, crate::theme::ThemeName::Light);
    }

    #[test]
    fn test_narrow_terminal_still_renders_both_panes() {
        let mut app = app_with(StaticSource::new());
        let buffer = render_app(&mut app, 60, 40);

        assert!(buffer_contains(&buffer, "Canvas"));
        assert!(buffer_contains(&buffer, "Chat"));
    }

    #[test]
    fn test_renders_at_minimum_size_without_panic() {
        let source = StaticSource::new()
            .with(AgentId::Mcp, AgentSnapshot::running(None, Some("call_tool")));
        let mut app = App::new(Box::new(source), &CanvasConfig::default());
        app.handle_app_event(AppEvent::OpenSettings);

        for (width, height) in [(20, 10), (40, 12), (80, 24), (200, 60)] {
            let buffer = render_app(&mut app, width, height);
            assert_eq!(buffer.area.width, width);
        }
    }
}
