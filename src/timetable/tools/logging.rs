use tracing_subscriber::EnvFilter;

use crate::error::{Result, ToolError};

/// Installs the global `tracing` subscriber, writing to stderr.
///
/// With no `-v` flags `RUST_LOG` decides, falling back to `info`. Each `-v`
/// raises the level and overrides `RUST_LOG`.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info")),
        level => EnvFilter::try_new(directive(level)),
    }
    .map_err(|error| ToolError::Logging(error.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
