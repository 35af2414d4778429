//! Command-line interface definition for maruadmin
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to run the dashboard server and to inspect local state.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// maruadmin - admin dashboard backend for the MaruBot agent
///
/// Serves the chat console, settings editor, skill manager and GPIO
/// configurator API in front of the `marubot` CLI.
#[derive(Parser, Debug, Clone)]
#[command(name = "maruadmin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "MARUADMIN_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat history database path
    #[arg(long, global = true)]
    pub history_db: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for maruadmin
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the dashboard HTTP server
    Serve {
        /// Address to listen on (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,

        /// Directory with the built dashboard UI
        #[arg(long)]
        ui_dir: Option<PathBuf>,
    },

    /// Inspect or clear the chat history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Inspect the agent settings document
    Settings {
        /// Settings subcommand
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List recent chat messages, oldest first
    List {
        /// Maximum number of messages to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete every stored chat message
    Clear,
}

/// Settings subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Print the agent settings document
    Show,

    /// Print the path of the agent settings document
    Path,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            verbose: false,
            history_db: None,
            command: Commands::Serve {
                bind: None,
                ui_dir: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, None);
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Serve {
                bind: None,
                ui_dir: None
            }
        ));
    }

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::try_parse_from(["maruadmin", "serve", "--bind", "0.0.0.0:3000"]).unwrap();
        if let Commands::Serve { bind, ui_dir } = cli.command {
            assert_eq!(bind, Some("0.0.0.0:3000".to_string()));
            assert_eq!(ui_dir, None);
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_history_list() {
        let cli =
            Cli::try_parse_from(["maruadmin", "history", "list", "--limit", "5", "--json"])
                .unwrap();
        if let Commands::History {
            command: HistoryCommand::List { limit, json },
        } = cli.command
        {
            assert_eq!(limit, 5);
            assert!(json);
        } else {
            panic!("Expected History List command");
        }
    }

    #[test]
    fn test_cli_parse_history_list_default_limit() {
        let cli = Cli::try_parse_from(["maruadmin", "history", "list"]).unwrap();
        if let Commands::History {
            command: HistoryCommand::List { limit, json },
        } = cli.command
        {
            assert_eq!(limit, 20);
            assert!(!json);
        } else {
            panic!("Expected History List command");
        }
    }

    #[test]
    fn test_cli_parse_history_clear_with_global_db() {
        let cli = Cli::try_parse_from([
            "maruadmin",
            "history",
            "clear",
            "--history-db",
            "/tmp/admin.db",
        ])
        .unwrap();
        assert_eq!(cli.history_db, Some(PathBuf::from("/tmp/admin.db")));
        assert!(matches!(
            cli.command,
            Commands::History {
                command: HistoryCommand::Clear
            }
        ));
    }

    #[test]
    fn test_cli_parse_settings_show() {
        let cli = Cli::try_parse_from(["maruadmin", "settings", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Settings {
                command: SettingsCommand::Show
            }
        ));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["maruadmin"]).is_err());
    }
}
