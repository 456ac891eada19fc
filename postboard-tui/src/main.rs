use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use std::time::{Duration, Instant};

use postboard::api::ApiClient;
use postboard::app::App;
use postboard::config::ConfigManager;
use postboard::logging::{self, LogConfig};
use postboard::session::SessionStore;
use postboard::{auth, log_debug, terminal, ui};
use postboard_types::PostId;

/// Postboard - a keyboard-driven client for the posts, comments and likes API
#[derive(Parser)]
#[command(name = "postboard")]
#[command(about = "Browse posts, comments and profiles from the terminal")]
#[command(version)]
struct Cli {
    /// Server URL to connect to
    #[arg(long, short, env = "POSTBOARD_SERVER_URL")]
    server: Option<String>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,

    /// Session token to use instead of the stored one
    #[arg(long, env = "POSTBOARD_SESSION_TOKEN")]
    session_token: Option<String>,

    /// Open this post on start-up
    #[arg(long)]
    post: Option<i64>,
}

// Load environment variables from .env file
// This allows POSTBOARD_SERVER_URL and other config to be set without command-line args
fn load_env() {
    let _ = dotenv::dotenv();
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    logging::init_logging(&log_config).context("Failed to initialize logging")?;

    let config_manager = ConfigManager::new()?;
    let server_url = config_manager.determine_server_url(cli.server)?;
    log::info!("Using server {}", server_url);

    let mut api_client = ApiClient::new(server_url);
    let session_store = SessionStore::new()?;
    let auth = auth::restore_session(&mut api_client, &session_store, cli.session_token).await;
    match auth.user() {
        Some(user) => log::info!("Signed in as {}", user.username),
        None => log::info!("Browsing anonymously"),
    }

    let mut app = App::new(api_client, auth);
    app.log_config = log_config;

    terminal::install_panic_hook();
    let mut tui = terminal::init()?;
    let result = run(&mut tui, &mut app, cli.post.map(PostId));
    terminal::restore()?;

    if let Err(e) = &result {
        log::error!("Exited with error: {:#}", e);
    }
    result
}

fn run(tui: &mut terminal::Tui, app: &mut App<ApiClient>, open_post: Option<PostId>) -> Result<()> {
    log_debug!(app.log_config, "Starting event loop");
    app.reload_feed();
    if let Some(id) = open_post {
        app.open_post(id);
    }

    while app.running {
        app.drain_completions();
        app.tick(Instant::now());

        tui.draw(|frame| ui::render(app, frame))?;

        // Handle events with timeout; the timeout keeps spinners and
        // notices moving while nothing is pressed
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(width, height) => {
                    log_debug!(app.log_config, "Terminal resized to {}x{}", width, height);
                }
                _ => {}
            }
        }
    }

    log::info!("Shutting down");
    Ok(())
}
