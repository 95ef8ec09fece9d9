use std::time::Duration;

use anyhow::Result;
use clap::Parser;

mod app;
mod client;
mod config;
mod handler;
mod presentation;
mod session;
mod status;
mod tui;
mod ui;

use app::App;
use client::EmpathClient;
use config::Config;
use status::StatusPoller;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "empath")]
#[command(about = "Terminal dashboard for the Reachy empath service")]
struct Cli {
    /// Base URL of the empath service
    #[arg(short, long)]
    url: Option<String>,

    /// Status poll interval in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Append diagnostics to this file (the terminal itself is the UI)
    #[arg(short, long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|_| Config::new());

    let url = cli.url.unwrap_or_else(|| config.service_url().to_string());
    let interval = Duration::from_millis(cli.interval_ms.unwrap_or(config.poll_interval_ms()));

    if let Some(path) = cli.log_file.or_else(|| config.log_file.clone()) {
        init_logging(&path)?;
    }

    // A stalled service must not wedge the poller or a chat round-trip.
    let client = EmpathClient::with_timeout(&url, Duration::from_secs(30))?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new();
    // The poller lives exactly as long as this view; stopped before restore.
    let poller = StatusPoller::spawn(client.clone(), interval, events.sender());

    let mut app = App::new(client);
    let result = run(&mut app, &mut terminal, &mut events).await;

    poller.stop();
    tui::restore()?;

    result
}

async fn run(app: &mut App, terminal: &mut tui::Tui, events: &mut EventHandler) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };

        let was_sending = app.session.is_sending();
        handler::handle_event(app, event)?;

        // Settle an outstanding chat round-trip; ticks arrive every 250ms so
        // a finished response is picked up promptly.
        app.session.poll_response().await;
        if was_sending && !app.session.is_sending() {
            app.scroll_chat_to_bottom();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn init_logging(path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    Ok(())
}
