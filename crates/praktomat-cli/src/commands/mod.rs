pub mod init;
pub mod run;
pub mod shell;

use std::path::PathBuf;

use anyhow::Result;

use crate::config::{load_config_from, OutputFormat, ShellConfig};

/// Loads the config file and applies command-line overrides.
fn resolve_config(path: Option<PathBuf>, format: Option<OutputFormat>) -> Result<ShellConfig> {
    let mut config = load_config_from(path.as_deref())?;
    if let Some(format) = format {
        config.format = format;
    }
    Ok(config)
}
