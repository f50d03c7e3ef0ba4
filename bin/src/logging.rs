//! Tracing subscriber setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over everything. Otherwise each `-v` raises the
/// configured level one step and `--quiet` drops it to warnings.
pub(crate) fn init(config: &LoggingConfig, verbose: u8, quiet: bool) -> Result<()> {
    let level = effective_level(&config.level, verbose, quiet);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid logging.level '{}': {e}", config.level))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

const LADDER: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn effective_level(configured: &str, verbose: u8, quiet: bool) -> &str {
    if quiet {
        return "warn";
    }
    let Some(base) = LADDER.iter().position(|l| l.eq_ignore_ascii_case(configured)) else {
        // Directive strings such as "brickline=debug" pass through untouched.
        return configured;
    };
    LADDER[(base + usize::from(verbose)).min(LADDER.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ladder() {
        assert_eq!(effective_level("info", 0, false), "info");
        assert_eq!(effective_level("info", 1, false), "debug");
        assert_eq!(effective_level("INFO", 5, false), "trace");
        assert_eq!(effective_level("debug", 2, true), "warn");
    }

    #[test]
    fn test_directive_passthrough() {
        assert_eq!(
            effective_level("brickline_feed=debug", 2, false),
            "brickline_feed=debug"
        );
    }
}
