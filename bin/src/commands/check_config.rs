//! Check-config command implementation.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;

/// Validates the loaded config and prints it with every default filled in.
pub(crate) fn check_config(config: &Config, source: Option<&Path>) -> Result<()> {
    match source {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => match Config::default_path() {
            Some(path) => println!("# No config file found, using defaults ({})", path.display()),
            None => println!("# No config directory available, using defaults"),
        },
    }
    config.validate()?;

    let text = toml::to_string_pretty(config).context("Failed to render config")?;
    print!("{text}");
    Ok(())
}
