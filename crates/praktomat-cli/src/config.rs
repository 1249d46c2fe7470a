//! Shell configuration.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the config file looked up in the current directory.
pub const CONFIG_FILE: &str = "praktomat.toml";

/// How report commands print their rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per row, as the shell always printed.
    #[default]
    Text,
    /// Rows as a pretty-printed JSON array.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Top-level praktomat shell configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt printed before each line in interactive mode.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Output format for report commands.
    #[serde(default)]
    pub format: OutputFormat,
    /// Echo every input line (after the prompt) before its output.
    #[serde(default)]
    pub echo: bool,
}

fn default_prompt() -> String {
    "praktomat> ".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            format: OutputFormat::default(),
            echo: false,
        }
    }
}

/// Load config from an explicit path, or `praktomat.toml` in the current
/// directory, or fall back to defaults.
pub fn load_config_from(path: Option<&Path>) -> Result<ShellConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => Some(PathBuf::from(CONFIG_FILE)).filter(|p| p.exists()),
    };

    match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))
        }
        None => Ok(ShellConfig::default()),
    }
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<ShellConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.prompt, "praktomat> ");
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.echo);
    }

    #[test]
    fn empty_file_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), ShellConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
prompt = "> "
format = "json"
echo = true
"#,
        )
        .unwrap();
        assert_eq!(config.prompt, "> ");
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.echo);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(parse_config(r#"format = "xml""#).is_err());
    }

    #[test]
    fn output_format_display_and_parse() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/praktomat.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }
}
