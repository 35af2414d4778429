//! First-run setup: OAuth values written into a dotenv-style file
//!
//! The sign-in gate in front of the dashboard reads these keys from its
//! environment file; this module only rewrites the file.

use crate::error::{AdminError, Result};
use regex::{NoExpand, Regex};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Body of `POST /api/setup`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    /// The only Google account allowed to sign in
    pub admin_gmail: String,
    pub client_id: String,
    pub client_secret: String,
    /// Session signing secret for the auth gate
    pub next_auth_secret: String,
}

impl SetupRequest {
    /// Env keys paired with the submitted values, in file order
    pub fn updates(&self) -> [(&'static str, &str); 4] {
        [
            ("ADMIN_GMAIL", self.admin_gmail.as_str()),
            ("GOOGLE_CLIENT_ID", self.client_id.as_str()),
            ("GOOGLE_CLIENT_SECRET", self.client_secret.as_str()),
            ("NEXTAUTH_SECRET", self.next_auth_secret.as_str()),
        ]
    }
}

/// A dotenv-style `KEY=value` file
#[derive(Debug, Clone)]
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Set every `(key, value)` pair and rewrite the file
    ///
    /// A missing file is treated as empty. Values are validated before
    /// anything is written, so a rejected request leaves the file untouched.
    pub fn apply(&self, updates: &[(&str, &str)]) -> Result<()> {
        for (key, value) in updates {
            validate_value(key, value)?;
        }

        let mut content = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(AdminError::Setup(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                ))
                .into())
            }
        };

        for (key, value) in updates {
            content = set_line(&content, key, value)?;
        }

        std::fs::write(&self.path, content).map_err(|e| {
            AdminError::Setup(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        let keys: Vec<&str> = updates.iter().map(|(k, _)| *k).collect();
        tracing::info!(path = %self.path.display(), ?keys, "env file updated");
        Ok(())
    }
}

fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(
            AdminError::InvalidRequest(format!("{} cannot contain line breaks", key)).into(),
        );
    }
    if value.contains('"') {
        return Err(
            AdminError::InvalidRequest(format!("{} cannot contain double quotes", key)).into(),
        );
    }
    Ok(())
}

/// Replace the first `KEY=...` line, or append one when absent
fn set_line(content: &str, key: &str, value: &str) -> Result<String> {
    let pattern = Regex::new(&format!(r"(?m)^{}=[^\r\n]*", regex::escape(key)))
        .map_err(|e| AdminError::Setup(e.to_string()))?;
    let line = format!("{}=\"{}\"", key, value);

    if pattern.is_match(content) {
        Ok(pattern.replacen(content, 1, NoExpand(&line)).into_owned())
    } else {
        Ok(format!("{}\n{}", content, line))
    }
}
