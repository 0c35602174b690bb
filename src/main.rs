mod api;
mod app;
mod commands;
mod events;
mod filter;
mod logging;
mod poller;
mod prefs;
mod state;
#[cfg(test)]
mod testutil;
mod tracker;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use app::App;
use commands::{handle_command, ApiCommands};
use prefs::FilePrefsStore;

#[derive(Parser, Debug)]
#[command(name = "hookwatch")]
#[command(about = "Terminal dashboard for a webhook-event API", long_about = None)]
struct Args {
    /// Backend API URL
    #[arg(long, default_value = "http://localhost:3000", global = true)]
    api_url: String,

    /// Refresh interval in seconds (for TUI mode)
    #[arg(long, default_value = "5", global = true)]
    refresh: u64,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<ApiCommands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.debug);

    match args.command {
        Some(ApiCommands::Dashboard) | None => {
            run_tui(args.api_url, args.refresh).await?;
        }
        Some(cmd) => {
            handle_command(cmd, &args.api_url).await?;
        }
    }

    Ok(())
}

async fn run_tui(api_url: String, refresh: u64) -> Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let prefs_store = Box::new(FilePrefsStore::resolve());
    let mut app = App::new(api_url, refresh, prefs_store)?;
    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
