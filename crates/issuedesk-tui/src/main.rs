//! issuedesk - terminal client for a REST issue tracker
//!
//! Lists, filters, creates, edits and deletes issues held by a remote
//! server. `issuedesk robot ...` prints the same data as JSON or HTML for
//! scripts.

mod alert;
mod app;
mod commands;
mod engine;
mod keys;
mod loading;
mod modal;
#[cfg(test)]
mod testing;
mod ui;
mod view;

use anyhow::{Context, Result};
use app::App;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use issuedesk_client::ApiClient;
use issuedesk_core::Config;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "issuedesk")]
#[command(about = "Terminal client for a REST issue tracker")]
#[command(version)]
struct Cli {
    /// Server base URL (overrides server_url from the config file)
    #[arg(short, long, env = "ISSUEDESK_SERVER")]
    server: Option<String>,

    /// Config file to use instead of the default location
    #[arg(short, long, env = "ISSUEDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Write logs to this file while the UI is running
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Machine-readable output for scripts
    Robot {
        #[command(subcommand)]
        mode: RobotMode,
    },
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum RobotMode {
    /// Filtered issues as JSON
    List(FilterArgs),
    /// Status counts as JSON
    Stats,
    /// Filtered issues as an HTML fragment
    Html(FilterArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// open, in_progress, closed or all
    #[arg(long, default_value = "all")]
    status: String,

    /// low, medium, high or all
    #[arg(long, default_value = "all")]
    priority: String,

    /// Case-insensitive text to look for in title and description
    #[arg(long)]
    search: Option<String>,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Reset to default configuration
    Reset,
    /// Set a config value
    Set {
        /// Config key (e.g. "server_url", "ui.alert_timeout_secs")
        key: String,
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.clone().or_else(Config::default_path) {
        Some(path) => path,
        None => anyhow::bail!("No config directory on this platform; pass --config"),
    };

    match cli.command {
        Some(Commands::Config { command }) => {
            let config = Config::load(&config_path)?;
            match command {
                Some(ConfigCommands::Show { json }) => commands::config_show(&config, json),
                Some(ConfigCommands::Reset) => commands::config_reset(&config_path),
                Some(ConfigCommands::Set { key, value }) => {
                    commands::config_set(&config_path, &key, &value)
                }
                None => commands::config_show(&config, false),
            }
        }
        Some(Commands::Robot { mode }) => {
            init_stderr_tracing();
            let config = load_config(&config_path, cli.server)?;
            run_robot_mode(&config, mode)
        }
        None => {
            let config = load_config(&config_path, cli.server)?;
            let log_file = cli.log_file.or_else(|| config.ui.log_file.clone());
            if let Some(path) = log_file.as_deref() {
                init_file_tracing(path)?;
            }
            run_tui(&config)
        }
    }
}

fn load_config(path: &Path, server: Option<String>) -> Result<Config> {
    let mut config = Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if let Some(server) = server {
        config.server_url = server;
    }
    Ok(config)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_stderr_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// The terminal belongs to the UI, so logs only go to a file
fn init_file_tracing(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_robot_mode(config: &Config, mode: RobotMode) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let mut out = io::stdout().lock();

    match mode {
        RobotMode::List(args) => {
            let filter =
                commands::build_filter(&args.status, &args.priority, args.search.as_deref())?;
            rt.block_on(commands::robot_list(&client, &filter, &mut out))
        }
        RobotMode::Stats => rt.block_on(commands::robot_stats(&client, &mut out)),
        RobotMode::Html(args) => {
            let filter =
                commands::build_filter(&args.status, &args.priority, args.search.as_deref())?;
            rt.block_on(commands::robot_html(&client, &filter, &mut out))
        }
    }
}

fn run_tui(config: &Config) -> Result<()> {
    let client = ApiClient::from_config(config)?;
    tracing::info!(url = %client.base_url(), "issuedesk starting");

    let (outcome_tx, outcome_rx) = std::sync::mpsc::channel();
    let engine = engine::start(client, outcome_tx)?;
    let mut app = App::new(engine, config.ui.alert_timeout());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &outcome_rx, config.ui.tick_rate());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "issuedesk exited with an error");
        eprintln!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    outcomes: &Receiver<engine::Outcome>,
    tick_rate: Duration,
) -> Result<()> {
    app.start();
    let mut engine_alive = true;
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(keys::parse_key_action(key)) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    app.handle_click(mouse.column, mouse.row);
                }
                _ => {}
            }
        }

        loop {
            match outcomes.try_recv() {
                Ok(outcome) => app.apply_outcome(outcome),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if engine_alive {
                        app.engine_stopped();
                        engine_alive = false;
                    }
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }
    }
}
