//! Tracing subscriber setup
//!
//! Human-readable or JSON log lines go to stderr, so command output on
//! stdout stays machine-readable. An optional file receives a copy of every
//! line; `GET /api/logs` tails that file.

use crate::config::LoggingConfig;
use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber from the logging configuration
///
/// `RUST_LOG` takes precedence over `config.level`.
///
/// # Errors
///
/// Returns error if the level is not a valid filter, the log file cannot be
/// opened, or a global subscriber is already installed.
///
/// # Examples
///
/// ```no_run
/// use maruadmin::config::LoggingConfig;
/// use maruadmin::telemetry;
///
/// telemetry::init(&LoggingConfig::default()).unwrap();
/// tracing::info!("ready");
/// ```
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(&config.level)))?;

    let file = match &config.file_path {
        Some(path) => Some(open_log_file(path)?),
        None => None,
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        let console_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr);
        let file_layer = file.map(|f| {
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(Arc::new(f))
        });
        registry.with(console_layer).with(file_layer).try_init()?;
    } else {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr);
        let file_layer = file.map(|f| {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_writer(Arc::new(f))
        });
        registry.with(console_layer).with(file_layer).try_init()?;
    }

    Ok(())
}

/// Warning-level stderr subscriber for events emitted before [`init`]
///
/// Config loading runs before the logging section is known; scope it with
/// `tracing::subscriber::with_default` so its warnings are not lost.
pub fn bootstrap() -> impl tracing::Subscriber + Send + Sync {
    fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .with_target(false)
        .finish()
}

/// Filter used when `RUST_LOG` is unset
///
/// A bare level applies to this crate and the HTTP trace layer only; any
/// value containing a directive separator is taken verbatim.
pub fn default_directive(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("maruadmin={level},tower_http={level}")
    }
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
