use std::fs::OpenOptions;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the tracing filter (e.g. `RB_LOG=debug`)
pub const LOG_ENV: &str = "RB_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Diagnostics to stderr, for CLI commands.
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

/// Diagnostics appended to `path`, for the TUI (stderr belongs to the screen).
pub fn init_file(path: &Path) -> std::io::Result<()> {
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
