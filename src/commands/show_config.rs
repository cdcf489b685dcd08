//! Command: print the resolved configuration.
use std::io::Write;

use anyhow::{Context as _, Result};

use crate::config::Config;

/// Write `config` to `out` as a TOML document that can be loaded back.
///
/// # Errors
///
/// Returns an error if the configuration cannot be encoded or `out` cannot
/// be written.
pub fn run(config: &Config, out: &mut dyn Write) -> Result<()> {
    let rendered =
        toml::to_string_pretty(&config.to_file()).context("failed to encode configuration")?;
    write!(out, "{rendered}")?;
    Ok(())
}
