mod app;
mod cli;
mod event;
mod logging;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use spin_wheel_tui::config::{get_log_file_path, init_wheel_config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    dotenv::dotenv().ok();

    let headless = args.headless || !is_terminal();
    let log_file = get_log_file_path();
    logging::init(headless, logging::debug_enabled(), log_file.as_deref())?;

    let config = init_wheel_config()?;
    info!(segments = config.segments.len(), headless, "starting");

    if headless {
        return event::run_headless(&config, args.json, args.spins).await;
    }

    let mut app = App::new(&config)?;

    // Setup terminal
    let mut terminal = terminal::setup()?;

    // Run the application
    let result = event::run(&mut terminal, &mut app);

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
