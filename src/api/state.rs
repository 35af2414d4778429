use crate::config::AdminConfig;
use crate::error::Result;
use crate::history::MessageStore;
use crate::relay::{AgentRelay, CommandRunner, SkillRelay};
use crate::settings::SettingsStore;
use crate::setup::EnvFile;
use std::sync::Arc;

/// Everything a request handler can reach
///
/// Built once at startup and shared behind an `Arc`; there are no lazily
/// created globals.
pub struct AppState {
    pub version: &'static str,
    pub config: AdminConfig,
    pub history: MessageStore,
    pub settings: SettingsStore,
    pub agent: AgentRelay,
    pub skills: SkillRelay,
    pub env_file: EnvFile,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Open the stores named in `config` and wire both relays to `runner`
    ///
    /// # Errors
    ///
    /// Returns error if a default path cannot be resolved or the history
    /// database cannot be opened.
    pub fn new(config: AdminConfig, runner: Arc<dyn CommandRunner>) -> Result<SharedState> {
        let history = MessageStore::open(config.storage.resolved_history_db()?)?;
        let settings = SettingsStore::new(config.storage.resolved_settings_path()?);
        let agent = AgentRelay::new(runner.clone(), &config.agent);
        let skills = SkillRelay::new(runner, &config.skills);
        let env_file = EnvFile::new(config.storage.env_file.clone());

        tracing::debug!(
            history_db = %history.path().display(),
            settings = %settings.path().display(),
            env_file = %env_file.path().display(),
            "application state ready"
        );

        Ok(Arc::new(Self {
            version: env!("CARGO_PKG_VERSION"),
            config,
            history,
            settings,
            agent,
            skills,
            env_file,
        }))
    }
}
