//! Logging setup for the command-line tool
//!
//! Plain level-and-message lines on stderr, no timestamps or targets, colored
//! only on a terminal. The filter comes from `RUST_LOG` (default `info`);
//! `--debug` forces `debug`.

use crate::Result;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_logging(debug: bool) -> Result<()> {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(())
}
