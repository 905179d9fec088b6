use clap::{Parser, Subcommand};
use shared_types::LanguageMode;
use std::path::PathBuf;

use crate::{commands, error::CliError};
use commands::*;

#[derive(Debug, Parser)]
#[command(name = "fundreq")]
#[command(about = "Turn spoken or typed funding requests into saved records")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request database path (overrides the config file)
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive request session (default)
    Session {
        /// Recognition language for voice input
        #[arg(short, long, default_value = "english", value_parser = parse_language)]
        language: LanguageMode,
    },

    /// List saved requests, newest first
    List,

    /// Extract request fields from one sentence and print them as JSON
    Extract {
        /// Text describing the request
        text: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration file location
    Path,

    /// Show the effective configuration
    Show,
}

fn parse_language(value: &str) -> Result<LanguageMode, String> {
    value.parse().map_err(|e: shared_types::ParseLanguageError| e.to_string())
}

impl Cli {
    pub async fn run(&self) -> Result<(), CliError> {
        let options = GlobalOptions {
            config: self.config.clone(),
            database: self.database.clone(),
        };

        match &self.command {
            Some(Commands::Session { language }) => run_session(&options, *language).await,
            Some(Commands::List) => list_requests(&options).await,
            Some(Commands::Extract { text }) => extract_once(&options, text).await,
            Some(Commands::Config { action }) => handle_config_command(&options, action),
            Some(Commands::Version) => self.handle_version(),
            None => run_session(&options, LanguageMode::default()).await,
        }
    }

    fn handle_version(&self) -> Result<(), CliError> {
        println!("fundreq version: {}", env!("CARGO_PKG_VERSION"));
        println!("Author: {}", env!("CARGO_PKG_AUTHORS"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_session() {
        let cli = Cli::try_parse_from(["fundreq"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_session_language_parsing() {
        let cli = Cli::try_parse_from(["fundreq", "session", "--language", "ar"]).unwrap();
        match cli.command {
            Some(Commands::Session { language }) => assert_eq!(language, LanguageMode::Arabic),
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["fundreq", "session", "--language", "klingon"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["fundreq", "list", "--database", "/tmp/r.db", "--verbose"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/r.db")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["fundreq", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Show
            })
        ));
    }
}
