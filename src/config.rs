//! Configuration management for maruadmin
//!
//! This module handles loading, parsing, validating, and managing the
//! service configuration from a YAML file, environment variables, and CLI
//! overrides. It is unrelated to the agent settings document edited through
//! `/api/config`, which lives in [`crate::settings`].

use crate::cli::{Cli, Commands};
use crate::error::{AdminError, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default location of the service configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/maruadmin.yaml";

/// Upper bound for any history page size
pub const MAX_HISTORY_LIMIT: usize = 1000;

/// Main configuration structure for maruadmin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Agent CLI invocation settings
    #[serde(default)]
    pub agent: AgentRelayConfig,
    /// Skills CLI invocation settings
    #[serde(default)]
    pub skills: SkillsRelayConfig,
    /// Persisted state locations
    #[serde(default)]
    pub storage: StorageConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind, e.g. `127.0.0.1:3000`
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory holding the prebuilt dashboard UI bundle
    ///
    /// When unset only the JSON API is served.
    #[serde(default)]
    pub ui_dir: Option<PathBuf>,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            ui_dir: None,
        }
    }
}

/// Agent relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRelayConfig {
    /// Agent executable, resolved through `PATH` when not absolute
    #[serde(default = "default_program")]
    pub program: String,

    /// Working directory for the agent process
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Seconds to wait for a reply (0 waits forever)
    #[serde(default = "default_agent_timeout")]
    pub timeout_seconds: u64,

    /// Glyph the agent prints in front of its reply
    #[serde(default = "default_reply_marker")]
    pub reply_marker: String,
}

fn default_program() -> String {
    "marubot".to_string()
}

fn default_agent_timeout() -> u64 {
    300
}

fn default_reply_marker() -> String {
    "🦞".to_string()
}

impl Default for AgentRelayConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            working_dir: None,
            timeout_seconds: default_agent_timeout(),
            reply_marker: default_reply_marker(),
        }
    }
}

/// Skills relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsRelayConfig {
    /// Skills executable, resolved through `PATH` when not absolute
    #[serde(default = "default_program")]
    pub program: String,

    /// Seconds to wait for a skills subcommand (0 waits forever)
    #[serde(default = "default_skills_timeout")]
    pub timeout_seconds: u64,
}

fn default_skills_timeout() -> u64 {
    120
}

impl Default for SkillsRelayConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_seconds: default_skills_timeout(),
        }
    }
}

/// Persisted state locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Agent settings document (defaults to `~/.marubot/config.json`)
    #[serde(default)]
    pub settings_path: Option<PathBuf>,

    /// Chat history database (defaults to `~/.marubot/web/admin.db`)
    #[serde(default)]
    pub history_db: Option<PathBuf>,

    /// Number of messages returned by `GET /api/chat` without `?limit`
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Env file updated by the setup form
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

fn default_history_limit() -> usize {
    50
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: None,
            history_db: None,
            history_limit: default_history_limit(),
            env_file: default_env_file(),
        }
    }
}

impl StorageConfig {
    /// Resolve the agent settings path, falling back to the per-user default
    pub fn resolved_settings_path(&self) -> Result<PathBuf> {
        match &self.settings_path {
            Some(p) => Ok(p.clone()),
            None => Ok(marubot_home()?.join("config.json")),
        }
    }

    /// Resolve the history database path, falling back to the per-user default
    pub fn resolved_history_db(&self) -> Result<PathBuf> {
        match &self.history_db {
            Some(p) => Ok(p.clone()),
            None => Ok(marubot_home()?.join("web").join("admin.db")),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json_format: bool,

    /// Optional file that receives a copy of every log line
    ///
    /// This is also the file tailed by `GET /api/logs`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

/// Per-user data directory shared with the agent CLI (`~/.marubot`)
pub fn marubot_home() -> Result<PathBuf> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| AdminError::Config("Could not determine home directory".into()))?;
    Ok(dirs.home_dir().join(".marubot"))
}

impl AdminConfig {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AdminError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| AdminError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(bind) = std::env::var("MARUADMIN_BIND") {
            self.server.bind = bind;
        }

        if let Ok(dir) = std::env::var("MARUADMIN_UI_DIR") {
            self.server.ui_dir = Some(PathBuf::from(dir));
        }

        if let Ok(program) = std::env::var("MARUADMIN_AGENT_PROGRAM") {
            self.agent.program = program;
        }

        if let Ok(program) = std::env::var("MARUADMIN_SKILLS_PROGRAM") {
            self.skills.program = program;
        }

        if let Ok(timeout) = std::env::var("MARUADMIN_AGENT_TIMEOUT") {
            if let Ok(value) = timeout.parse() {
                self.agent.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid MARUADMIN_AGENT_TIMEOUT: {}", timeout);
            }
        }

        if let Ok(path) = std::env::var("MARUADMIN_SETTINGS_PATH") {
            self.storage.settings_path = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("MARUADMIN_HISTORY_DB") {
            self.storage.history_db = Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("MARUADMIN_ENV_FILE") {
            self.storage.env_file = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("MARUADMIN_LOG_FILE") {
            self.logging.file_path = Some(PathBuf::from(path));
        }

        if let Ok(json_logs) = std::env::var("MARUADMIN_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json_format = v,
                Err(_) => {
                    tracing::warn!("Invalid value for MARUADMIN_JSON_LOGS: {}", json_logs);
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        if let Some(db) = &cli.history_db {
            self.storage.history_db = Some(db.clone());
        }

        if let Commands::Serve { bind, ui_dir } = &cli.command {
            if let Some(bind) = bind {
                self.server.bind = bind.clone();
            }
            if let Some(dir) = ui_dir {
                self.server.ui_dir = Some(dir.clone());
            }
        }
    }

    /// Parsed listener address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind.parse().map_err(|e| {
            AdminError::Config(format!("Invalid bind address {}: {}", self.server.bind, e)).into()
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.agent.program.trim().is_empty() {
            return Err(AdminError::Config("agent.program cannot be empty".to_string()).into());
        }

        if self.skills.program.trim().is_empty() {
            return Err(AdminError::Config("skills.program cannot be empty".to_string()).into());
        }

        if self.agent.reply_marker.is_empty() {
            return Err(
                AdminError::Config("agent.reply_marker cannot be empty".to_string()).into(),
            );
        }

        if self.storage.history_limit == 0 {
            return Err(AdminError::Config(
                "storage.history_limit must be greater than 0".to_string(),
            )
            .into());
        }

        if self.storage.history_limit > MAX_HISTORY_LIMIT {
            return Err(AdminError::Config(format!(
                "storage.history_limit must be less than or equal to {}",
                MAX_HISTORY_LIMIT
            ))
            .into());
        }

        Ok(())
    }
}
