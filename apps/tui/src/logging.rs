use color_eyre::eyre::{eyre, Result, WrapErr};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

/// Installs the global fmt subscriber. Headless runs log to stderr; the TUI
/// only logs when given a file, since stderr shares the alternate screen.
pub fn init(headless: bool, debug: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let installed = match (log_file, headless) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        (None, true) => builder.with_writer(std::io::stderr).try_init(),
        (None, false) => return Ok(()),
    };

    installed.map_err(|e| eyre!("Failed to install logger: {e}"))
}

pub fn debug_enabled() -> bool {
    std::env::var("DEBUG").is_ok_and(|value| !matches!(value.as_str(), "" | "0" | "false"))
}
