//! praktomat CLI — interactive gradebook shell.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::OutputFormat;

mod commands;
mod config;
mod interpreter;
mod session;

#[derive(Parser)]
#[command(
    name = "praktomat",
    version,
    about = "Gradebook shell for tutors, students, tasks, and reviews"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive shell (default)
    Shell {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report output format: text, json
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Execute the commands in a script file
    Run {
        /// Path to a file with one shell command per line
        #[arg(long)]
        script: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report output format: text, json
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Create a starter praktomat.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("praktomat=warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::shell::execute(None, None),
        Some(Commands::Shell { config, format }) => commands::shell::execute(config, format),
        Some(Commands::Run {
            script,
            config,
            format,
        }) => commands::run::execute(script, config, format),
        Some(Commands::Init) => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
