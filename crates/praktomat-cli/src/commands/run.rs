//! The `praktomat run` command.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::commands::resolve_config;
use crate::config::OutputFormat;
use crate::session::Session;

pub fn execute(
    script: PathBuf,
    config_path: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let config = resolve_config(config_path, format)?;
    let file = File::open(&script)
        .with_context(|| format!("failed to open script: {}", script.display()))?;
    tracing::info!(script = %script.display(), "running script");

    let mut session = Session::new(config, std::io::stdout().lock());
    session.run(BufReader::new(file), false)?;
    tracing::debug!(
        tasks = session.gradebook().tasks().len(),
        students = session.gradebook().students().count(),
        "script finished"
    );
    Ok(())
}
