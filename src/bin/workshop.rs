use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::{Write, stdout};
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tilt_workshop::app::{WorkshopAction, WorkshopApp, build_machine};
use tilt_workshop::config::WorkshopConfig;
use tilt_workshop::error::{Result, WorkshopError};
use tilt_workshop::event::{Event, EventHandler};
use tilt_workshop::provider::LocalClicks;
use tilt_workshop::workshop::{Machine, State};
use tilt_workshop::{persist, render, ui};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilt-workshop")]
#[command(author, version, about = "Guides you through the Tilt workshop step by step")]
struct Args {
    /// Path to config file (default: <config dir>/tilt-workshop/workshop.toml)
    #[arg(long)]
    config: Option<String>,

    /// Simulate Tilt and the app; buttons are pressed with Enter
    #[arg(long)]
    dryrun: bool,

    /// Print progress as plain text instead of the full-screen UI
    #[arg(long)]
    plain: bool,

    /// Keep progress in this file between runs
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Ignore saved progress and start from the welcome step
    #[arg(long)]
    reset: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting tilt-workshop");
        }
    }

    // Load config from specified path, default path, or use defaults
    let loaded = match args.config.as_deref() {
        Some(path) => WorkshopConfig::load_from(path),
        None => WorkshopConfig::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        WorkshopConfig::default()
    });

    // Flags override config
    if args.dryrun {
        config.general.dryrun = true;
    }
    if args.state_file.is_some() {
        config.state_file = args.state_file.clone();
    }

    let state = match (&config.state_file, args.reset) {
        (Some(path), false) => persist::load_state(path)?.unwrap_or_default(),
        _ => State::default(),
    };

    let (machine, clicks) = build_machine(&config)?;

    if args.plain {
        return run_plain(&machine, &config, state, clicks).await;
    }

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    // Initialize terminal
    let mut terminal = setup_terminal()?;

    let mut app = WorkshopApp::new(config, state, clicks);
    let result = run_tui(&mut terminal, &mut app, &machine).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Workshop error: {}", e);
    }

    result
}

async fn run_plain(
    machine: &Machine,
    config: &WorkshopConfig,
    mut state: State,
    clicks: Option<Arc<LocalClicks>>,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = clicks.is_some();

    loop {
        state = machine.advance(&state, &cancel).await;

        {
            let mut out = stdout().lock();
            render::print_state(&mut out, &state)?;
            if let (Some(button), true) = (state.buttons.first(), stdin_open) {
                writeln!(out, "Press Enter to click \"{}\"", button.label)?;
            }
            out.flush()?;
        }

        if let Some(path) = &config.state_file {
            persist::save_state(path, &state)?;
        }

        if state.workshop_done.is_set() || cancel.is_cancelled() {
            break;
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(config.poll.interval()) => {}
            line = lines.next_line(), if stdin_open => match (line, &clicks, state.buttons.first()) {
                (Ok(Some(_)), Some(clicks), Some(button)) => clicks.click(&button.id),
                (Ok(Some(_)), _, _) => {}
                _ => stdin_open = false,
            },
        }
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| WorkshopError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| WorkshopError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal =
        Terminal::new(backend).map_err(|e| WorkshopError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| WorkshopError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen)
        .map_err(|e| WorkshopError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_tui(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut WorkshopApp,
    machine: &Machine,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);
    let cancel = CancellationToken::new();

    loop {
        // Draw UI
        terminal
            .draw(|frame| ui::draw(frame, app))
            .map_err(|e| WorkshopError::Terminal(e.to_string()))?;

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => match app.handle_key(key) {
                    Some(WorkshopAction::Refresh) => app.advance(machine, &cancel).await,
                    Some(WorkshopAction::Quit) => cancel.cancel(),
                    None => {}
                },
                Event::Resize => {
                    // Terminal will redraw on next loop
                }
                Event::Tick => {
                    if app.poll_due(Instant::now()) {
                        app.advance(machine, &cancel).await;
                    }
                }
            }
        }

        if app.should_exit {
            break;
        }
    }

    Ok(())
}
