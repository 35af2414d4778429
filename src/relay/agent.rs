//! Agent relay: one chat turn through `marubot agent -m <text>`

use super::{timeout_from_secs, CommandRunner, Invocation};
use crate::config::AgentRelayConfig;
use crate::error::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Forwards chat messages to the agent CLI
#[derive(Clone)]
pub struct AgentRelay {
    runner: Arc<dyn CommandRunner>,
    program: String,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    marker: String,
}

impl AgentRelay {
    /// Build a relay from the `agent` config section
    pub fn new(runner: Arc<dyn CommandRunner>, config: &AgentRelayConfig) -> Self {
        Self {
            runner,
            program: config.program.clone(),
            working_dir: config.working_dir.clone(),
            timeout: timeout_from_secs(config.timeout_seconds),
            marker: config.reply_marker.clone(),
        }
    }

    /// Program this relay invokes
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Send `message` to the agent and return its cleaned reply
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AdminError::Relay`] when the agent cannot be
    /// started or exits unsuccessfully, and
    /// [`crate::error::AdminError::RelayTimeout`] when it runs too long.
    pub async fn converse(&self, message: &str) -> Result<String> {
        let invocation = Invocation::new(&self.program, ["agent", "-m", message])
            .with_working_dir(self.working_dir.clone())
            .with_timeout(self.timeout);

        let output = self
            .runner
            .run(&invocation)
            .await?
            .into_checked(&self.program)?;

        let reply = strip_reply_prefix(&output.stdout, &self.marker);
        tracing::debug!(reply_len = reply.len(), "agent replied");
        Ok(reply)
    }
}

/// Drop everything up to and including the first `marker`, then trim
///
/// The agent prints `\n<marker> <reply>\n`, possibly after log lines. When
/// the marker is missing the whole output is returned trimmed.
///
/// # Examples
///
/// ```
/// use maruadmin::relay::strip_reply_prefix;
///
/// assert_eq!(strip_reply_prefix("\n🦞 hi there\n", "🦞"), "hi there");
/// assert_eq!(strip_reply_prefix("plain", "🦞"), "plain");
/// ```
pub fn strip_reply_prefix(raw: &str, marker: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.split_once(marker) {
        Some((_, reply)) => reply.trim().to_string(),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::relay::testing::StubRunner;

    fn relay_with(runner: Arc<StubRunner>) -> AgentRelay {
        AgentRelay::new(runner, &AgentRelayConfig::default())
    }

    #[test]
    fn test_strip_reply_prefix_drops_noise() {
        assert_eq!(
            strip_reply_prefix("<noise>🦞 actual reply", "🦞"),
            "actual reply"
        );
    }

    #[test]
    fn test_strip_reply_prefix_handles_log_lines_before_marker() {
        let raw = "2024/05/01 INFO loading skills\n2024/05/01 INFO ready\n\n🦞 Hello!\nSecond line\n\n";
        assert_eq!(strip_reply_prefix(raw, "🦞"), "Hello!\nSecond line");
    }

    #[test]
    fn test_strip_reply_prefix_only_first_marker() {
        assert_eq!(
            strip_reply_prefix("🦞 I am 🦞 MaruBot", "🦞"),
            "I am 🦞 MaruBot"
        );
    }

    #[test]
    fn test_strip_reply_prefix_without_marker() {
        assert_eq!(strip_reply_prefix("  just text \n", "🦞"), "just text");
        assert_eq!(strip_reply_prefix("", "🦞"), "");
    }

    #[test]
    fn test_strip_reply_prefix_custom_marker() {
        assert_eq!(strip_reply_prefix("bot> answer", ">"), "answer");
    }

    #[tokio::test]
    async fn test_converse_passes_message_as_single_argument() {
        let runner = Arc::new(StubRunner::ok("\n🦞 hi there\n"));
        let relay = relay_with(runner.clone());

        let message = "what's \"up\"; rm -rf ~";
        let reply = relay.converse(message).await.unwrap();
        assert_eq!(reply, "hi there");

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "marubot");
        assert_eq!(calls[0].args, vec!["agent", "-m", message]);
        assert_eq!(calls[0].timeout, Some(Duration::from_secs(300)));
    }

    #[tokio::test]
    async fn test_converse_failure_carries_stderr() {
        let runner = Arc::new(StubRunner::failing(1, "Error: no API key configured"));
        let relay = relay_with(runner);

        let err = relay.converse("hello").await.unwrap_err();
        match err.downcast_ref::<AdminError>() {
            Some(AdminError::Relay { stderr, .. }) => {
                assert_eq!(stderr, "Error: no API key configured");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_converse_uses_configured_program_and_dir() {
        let runner = Arc::new(StubRunner::ok("🦞 ok"));
        let config = AgentRelayConfig {
            program: "/opt/marubot/bin/marubot".to_string(),
            working_dir: Some(PathBuf::from("/opt/marubot")),
            timeout_seconds: 0,
            reply_marker: "🦞".to_string(),
        };
        let relay = AgentRelay::new(runner.clone(), &config);
        assert_eq!(relay.program(), "/opt/marubot/bin/marubot");
        relay.converse("ping").await.unwrap();

        let call = &runner.calls()[0];
        assert_eq!(call.working_dir, Some(PathBuf::from("/opt/marubot")));
        assert_eq!(call.timeout, None);
    }
}
