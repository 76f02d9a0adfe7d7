mod config;
mod db;
mod fetch;
mod logging;
mod models;
mod prefs;
mod server;
mod sorting;
mod source;
mod state;
mod ui;

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{info, warn};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::config::Config;
use crate::fetch::FetchClient;
use crate::prefs::{FileStore, PreferenceStore};
use crate::server::ServeConfig;
use crate::source::RecordSource;
use crate::state::{ClientsView, ViewAction};
use crate::ui::clients::{ClientAction, ClientsState, handle_input, render_clients};

#[derive(Parser)]
#[command(name = "client_manager", version, about = "Browse and serve client records")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse clients in the terminal (default)
    Browse {
        /// Read clients from a JSON file instead of the database or server
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Serve the client list over HTTP
    Serve {
        /// Port to listen on, overriding PORT
        #[arg(long)]
        port: Option<u16>,
        /// Serve clients from a JSON file instead of the database
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
}

// Main application state
struct AppState {
    source: RecordSource,
    fetch: FetchClient,
    clients_state: ClientsState,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    match cli.command.unwrap_or(Command::Browse { fixture: None }) {
        Command::Browse { fixture } => browse(&config, fixture).await,
        Command::Serve { port, fixture } => {
            logging::init_stdout();
            let source = match fixture {
                Some(path) => RecordSource::from_fixture_file(&path)?,
                None => RecordSource::Database(db::init(&config).await?),
            };
            let serve_config = ServeConfig {
                bind: SocketAddr::from(([0, 0, 0, 0], port.unwrap_or(config.port))),
                cors_origin: config.cors_origin.clone(),
            };
            server::serve(serve_config, source).await
        }
    }
}

async fn browse(config: &Config, fixture: Option<PathBuf>) -> Result<()> {
    logging::init_file(&config.log_file)?;

    let source = match (fixture, &config.api_url) {
        (Some(path), _) => RecordSource::from_fixture_file(&path)?,
        (None, Some(api_url)) => RecordSource::http(api_url.clone()),
        (None, None) => RecordSource::Database(db::init(config).await?),
    };
    info!(source = %source.describe(), "starting client browser");

    // Restore saved sort preferences and persist every change
    let prefs = PreferenceStore::new(FileStore::new(config.prefs_path()));
    let view = ClientsView::new(prefs.load()).with_commit_hook(move |criteria| {
        if let Err(err) = prefs.save(criteria) {
            warn!("failed to save sort preferences: {err:#}");
        }
    });

    let mut app_state = AppState {
        source,
        fetch: FetchClient::new(),
        clients_state: ClientsState::new(view),
    };
    start_fetch(&mut app_state);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Any result still in flight is discarded from here on
    drop(app_state);

    result
}

fn start_fetch(app_state: &mut AppState) {
    app_state.fetch.start(app_state.source.clone());
    app_state.clients_state.dispatch(ViewAction::FetchStarted);
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        if let Some(outcome) = app_state.fetch.poll() {
            app_state.clients_state.dispatch(ViewAction::FetchFinished(outcome));
        }

        terminal.draw(|f| render_clients(f, &mut app_state.clients_state))?;

        match handle_input(&mut app_state.clients_state)? {
            Some(ClientAction::Quit) => break,
            Some(ClientAction::Refresh) => start_fetch(app_state),
            None => {}
        }
    }

    Ok(())
}
