//! The `praktomat shell` command.

use std::io;
use std::path::PathBuf;

use anyhow::Result;

use crate::commands::resolve_config;
use crate::config::OutputFormat;
use crate::session::Session;

pub fn execute(config_path: Option<PathBuf>, format: Option<OutputFormat>) -> Result<()> {
    let config = resolve_config(config_path, format)?;
    tracing::debug!(?config, "starting interactive shell");

    let stdin = io::stdin();
    let mut session = Session::new(config, io::stdout().lock());
    session.run(stdin.lock(), true)
}
