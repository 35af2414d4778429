//! maruadmin - admin dashboard backend for the MaruBot agent CLI
//!
#![doc = "Main entry point for the maruadmin server and maintenance commands."]

use anyhow::Result;

use maruadmin::cli::{Cli, Commands};
use maruadmin::commands;
use maruadmin::config::{AdminConfig, DEFAULT_CONFIG_PATH};
use maruadmin::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = tracing::subscriber::with_default(telemetry::bootstrap(), || {
        AdminConfig::load(config_path, &cli)
    })?;

    // Validate configuration
    config.validate()?;

    telemetry::init(&config.logging)?;
    tracing::debug!(config = config_path, "configuration loaded");

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting dashboard server");
            commands::run_server(config).await
        }
        Commands::History { command } => {
            tracing::debug!("Starting history command");
            commands::handle_history(command, &config)
        }
        Commands::Settings { command } => {
            tracing::debug!("Starting settings command");
            commands::handle_settings(command, &config)
        }
    }
}
