//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Reversible PII anonymization for German-language documents
#[derive(Parser, Debug)]
#[command(name = "anonym")]
#[command(version, about, long_about = None)]
#[command(author = "Anonym Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "anonym.toml", env = "ANONYM_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ANONYM_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a text or document file
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Restore originals for a previously anonymized text or document
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// Queue files for anonymization and wait for the results
    Process(commands::process::ProcessArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Purge mapping sessions past their retention
    CleanupSessions(commands::cleanup::CleanupArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_anonymize() {
        let cli = Cli::parse_from(["anonym", "anonymize", "--text", "Hallo"]);
        assert_eq!(cli.config, "anonym.toml");
        assert!(matches!(cli.command, Commands::Anonymize(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["anonym", "--config", "custom.toml", "validate-config"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["anonym", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_deanonymize() {
        let cli = Cli::parse_from([
            "anonym",
            "deanonymize",
            "--text",
            "anno_0123abcd",
            "--session",
            "s1",
        ]);
        assert!(matches!(cli.command, Commands::Deanonymize(_)));
    }

    #[test]
    fn test_cli_parse_process() {
        let cli = Cli::parse_from(["anonym", "process", "a.json", "b.xml"]);
        assert!(matches!(cli.command, Commands::Process(_)));
    }

    #[test]
    fn test_cli_parse_cleanup() {
        let cli = Cli::parse_from(["anonym", "cleanup-sessions", "--dry-run"]);
        assert!(matches!(cli.command, Commands::CleanupSessions(_)));
    }
}
