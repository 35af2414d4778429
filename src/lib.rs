//! maruadmin - admin dashboard backend for the MaruBot agent CLI
//!
//! This library provides the HTTP API behind the MaruBot web dashboard: a
//! chat console relayed to the agent CLI with a local history, an editor for
//! the agent's settings document, a skill manager, a GPIO pin configurator
//! and a first-run setup form.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `history`: SQLite chat history and key/value settings table
//! - `settings`: typed read/write of the agent's `config.json`
//! - `relay`: argv-based invocation of the agent and skills programs
//! - `setup`: env file updates for the sign-in gate
//! - `gpio`: 40-pin header table and saved pin assignments
//! - `stats`: host resource snapshot and log tail
//! - `api`: axum router and request handlers
//! - `config`: service configuration and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: command-line interface and its handlers
//! - `telemetry`: tracing subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use maruadmin::api::{build_router, AppState};
//! use maruadmin::relay::TokioCommandRunner;
//! use maruadmin::AdminConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AdminConfig::load("config/maruadmin.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let addr = config.bind_addr()?;
//!     let state = AppState::new(config, Arc::new(TokioCommandRunner))?;
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, build_router(state)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gpio;
pub mod history;
pub mod relay;
pub mod settings;
pub mod setup;
pub mod stats;
pub mod telemetry;

// Re-export commonly used types
pub use config::AdminConfig;
pub use error::{AdminError, Result};
pub use history::{ChatMessage, MessageStore, Role};
pub use relay::{AgentRelay, CommandRunner, Invocation, ProcessOutput, SkillRelay};
pub use settings::{AgentSettings, SettingsStore};
