//! agent-canvas - live status canvas for cooperating agents
//!
//! Shows which of the travel, research and MCP agents is running, and on
//! which node, next to a chat pane.
//!
//! ## Usage
//!
//! ```bash
//! # Watch ~/.agent-canvas/status/
//! agent-canvas
//!
//! # With verbose logging
//! agent-canvas -v
//!
//! # Watch another status directory
//! agent-canvas --status-dir /tmp/agents
//!
//! # Canned data, no status files needed
//! agent-canvas --demo
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use canvas_core::{
    AgentId, AgentSnapshot, AgentStatusSource, CanvasConfig, CanvasError, LogGuard, StaticSource,
    StatusReader, StatusWatcher, WatcherConfig, init_logging,
};
use canvas_tui::App;
use clap::Parser;
use tracing::{error, info, warn};

/// Agent Canvas
///
/// A terminal view of multi-agent activity: chat on the left, the running
/// agent and its current node on the right.
#[derive(Parser, Debug)]
#[command(name = "agent-canvas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.agent-canvas/logs/)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.agent-canvas/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the agents' status files
    #[arg(long)]
    status_dir: Option<PathBuf>,

    /// Show canned agent activity instead of watching status files
    #[arg(long)]
    demo: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    install_panic_hook();

    info!(demo = cli.demo, "Starting agent canvas");

    match run_app(&cli) {
        Ok(()) => {
            info!("Agent canvas exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Agent canvas error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();

    crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    crossterm::execute!(stdout, crossterm::cursor::Show)?;

    stdout.flush()?;

    Ok(())
}

fn setup_logging(cli: &Cli) -> canvas_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

fn load_config(cli: &Cli) -> anyhow::Result<CanvasConfig> {
    let mut config = match &cli.config {
        Some(path) => CanvasConfig::load_from(path)?,
        None => CanvasConfig::load()?,
    };
    if let Some(dir) = &cli.status_dir {
        config.status_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Canned activity: the research agent mid-search.
fn demo_source() -> StaticSource {
    StaticSource::new().with(
        AgentId::Research,
        AgentSnapshot::running(None, Some("search")),
    )
}

/// Status source plus an optional notice for the chat transcript.
type Source = (Box<dyn AgentStatusSource>, Option<String>);

fn build_source(cli: &Cli, config: &CanvasConfig) -> anyhow::Result<Source> {
    if cli.demo {
        return Ok((
            Box::new(demo_source()),
            Some("Demo mode: showing canned agent activity.".to_string()),
        ));
    }

    let status_dir = config.resolved_status_dir()?;
    info!(status_dir = %status_dir.display(), "Watching agent status files");

    match StatusWatcher::new(WatcherConfig::new(&status_dir).with_debounce_ms(config.debounce_ms))
    {
        Ok(watcher) => Ok((Box::new(watcher), None)),
        Err(e) => {
            // Fall back to reading the files on every draw
            warn!(error = %e, "Status watcher unavailable, reading status files on demand");
            let reader = StatusReader::new(Some(status_dir.clone()))
                .with_context(|| format!("failed to read {}", status_dir.display()))?;
            let notice = format!("Not watching {} ({e}); polling instead.", status_dir.display());
            Ok((Box::new(reader), Some(notice)))
        }
    }
}

fn print_guidance(err: &CanvasError) {
    if let Some(hint) = err.guidance() {
        eprintln!("{hint}");
    }
}

fn run_app(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli).inspect_err(|e| {
        if let Some(err) = e.downcast_ref::<CanvasError>() {
            print_guidance(err);
        }
    })?;
    let (source, notice) = build_source(cli, &config)?;

    let mut app = App::new(source, &config);
    if let Some(notice) = notice {
        app.notify(notice);
    }
    app.run().map_err(|e| {
        if let Some(err) = e.downcast_ref::<CanvasError>() {
            print_guidance(err);
        }
        anyhow::anyhow!("{e}")
    })
}
