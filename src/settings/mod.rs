//! Agent settings document store
//!
//! Reads and writes the JSON settings file shared with the agent CLI. The
//! file is replaced wholesale on every save; there is no merge, backup or
//! locking, so concurrent saves are last-writer-wins.

use crate::error::{AdminError, Result};
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{AgentDefaults, AgentSettings, AgentsSection, ProviderCredentials};

/// File-backed store for [`AgentSettings`]
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store for the document at `path`
    ///
    /// The file does not need to exist yet.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the settings document
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Settings`] if the file cannot be read or is not
    /// a valid settings document.
    pub fn read(&self) -> Result<Option<AgentSettings>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "settings file not found");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            AdminError::Settings(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let settings = serde_json::from_str(&contents).map_err(|e| {
            AdminError::Settings(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;
        Ok(Some(settings))
    }

    /// Overwrite the settings document
    ///
    /// Parent directories are created when missing. The write is not atomic.
    pub fn write(&self, settings: &AgentSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AdminError::Settings(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(|e| {
            AdminError::Settings(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
