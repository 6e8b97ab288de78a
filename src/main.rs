use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use movie_recommender::api::{HttpRecommendationClient, RecommendationApi};
use movie_recommender::app::App;
use movie_recommender::cli::{self, Cli};
use movie_recommender::config::{self, Config};
use movie_recommender::tui::{self, EventHandler, Tui};
use movie_recommender::{handler, ui};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    cli.apply(&mut config);

    match cli.command {
        Some(command) => {
            init_stderr_logging();
            cli::run_headless(command, &config).await
        }
        None => {
            init_file_logging(&config);
            run_tui(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .init();
}

/// The TUI owns the terminal, so logs go to a file. If the file cannot be
/// opened the app still runs, without logs.
fn init_file_logging(config: &Config) {
    let Some(path) = config.log_path() else {
        eprintln!("warning: no log file location available, logging disabled");
        return;
    };
    let file = match config::open_log_file(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: {:#}, logging disabled", e);
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    tracing::info!(api = %config.api_base_url, log = %path.display(), "Starting recommender");
}

async fn run_tui(config: &Config) -> Result<()> {
    tui::leave_on_panic();
    let mut terminal = tui::enter()?;

    let mut events = EventHandler::start(tui::TICK_RATE);
    let api: Arc<dyn RecommendationApi> =
        Arc::new(HttpRecommendationClient::new(&config.api_base_url));
    let mut app = App::new(api, config.request_timeout(), events.sender());

    let result = run_loop(&mut terminal, &mut app, &mut events).await;
    tui::leave()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}
