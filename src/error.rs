//! Error types for maruadmin
//!
//! This module defines the error types shared by the stores, the relays and
//! the HTTP layer, using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for maruadmin operations
///
/// The HTTP layer downcasts `anyhow::Error` values to this type to pick a
/// status code, so every failure that should not surface as a plain 500 is
/// represented here.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Service configuration errors (YAML file, env overrides, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Agent settings document errors (the agent CLI's config.json)
    #[error("Settings error: {0}")]
    Settings(String),

    /// Chat history database errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The store handle was closed or could not be acquired
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// External program failed to spawn or exited unsuccessfully
    #[error("Relay error: {program} exited with {status}: {stderr}")]
    Relay {
        /// Program that was invoked
        program: String,
        /// Exit status description (`exit code 1`, `spawn failure`, ...)
        status: String,
        /// Diagnostic text captured from the process
        stderr: String,
    },

    /// External program did not finish within the configured timeout
    #[error("Relay timeout: {program} did not finish within {seconds}s")]
    RelayTimeout {
        /// Program that was invoked
        program: String,
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// Request was well-formed JSON but semantically invalid
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Env file update errors from the setup form
    #[error("Setup error: {0}")]
    Setup(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for maruadmin operations
///
/// Uses `anyhow::Error` so callers can attach context while still allowing
/// the HTTP layer to recover an [`AdminError`] via `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
