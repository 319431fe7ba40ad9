//! Diagnostics setup via tracing-subscriber.
//!
//! Output goes to stderr so it never interleaves with replies on stdout.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the global subscriber. `RUST_LOG` wins over `level`; `level` falls
/// back to [`DEFAULT_LOG_LEVEL`] when unset.
pub fn init(level: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| format!("invalid log level '{level}': {err}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| format!("failed to install tracing subscriber: {err}"))?;

    Ok(())
}

/// Validate a level string before it is written to the config file.
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let level = level.trim();
    if level.is_empty() {
        return Err("log level must not be empty".to_string());
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| format!("unrecognized log level '{level}' (expected error, warn, info, debug, trace, or off)"))
}
