//! The `praktomat init` command.

use std::path::Path;

use anyhow::Result;

use crate::config::CONFIG_FILE;

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE}");
    }

    println!("\nNext steps:");
    println!("  1. Adjust the prompt or output format in {CONFIG_FILE}");
    println!("  2. Run: praktomat shell");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# praktomat configuration

# Printed before each command in the interactive shell.
prompt = "praktomat> "

# Report output: "text" or "json".
format = "text"

# Echo each input line before its output (handy for script transcripts).
echo = false
"#;
