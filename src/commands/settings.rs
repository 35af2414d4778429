use crate::cli::SettingsCommand;
use crate::config::AdminConfig;
use crate::error::Result;
use crate::settings::SettingsStore;
use colored::Colorize;

/// Handle settings commands
pub fn handle_settings(command: SettingsCommand, config: &AdminConfig) -> Result<()> {
    let store = SettingsStore::new(config.storage.resolved_settings_path()?);

    match command {
        SettingsCommand::Show => match store.read()? {
            Some(settings) => {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            None => {
                println!(
                    "{}",
                    format!("No agent settings found at {}", store.path().display()).yellow()
                );
            }
        },
        SettingsCommand::Path => {
            println!("{}", store.path().display());
        }
    }

    Ok(())
}
