//! Relays to the external agent and skills programs
//!
//! Every invocation is an argument vector handed straight to the OS. No shell
//! is involved, so user text such as chat messages or skill names can never
//! be interpreted as shell syntax.

use crate::error::{AdminError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

pub mod agent;
pub mod skills;

pub use agent::{strip_reply_prefix, AgentRelay};
pub use skills::{SkillAction, SkillOutput, SkillRelay};

/// A single program invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable name or path
    pub program: String,
    /// Arguments, passed as-is
    pub args: Vec<String>,
    /// Working directory for the child
    pub working_dir: Option<PathBuf>,
    /// Upper bound on run time
    pub timeout: Option<Duration>,
}

impl Invocation {
    /// Invocation of `program` with `args` and no working directory or timeout
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            timeout: None,
        }
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the timeout; `None` waits forever
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Whether the process exited successfully
    pub success: bool,
    /// Standard output, lossily decoded as UTF-8
    pub stdout: String,
    /// Standard error, lossily decoded as UTF-8
    pub stderr: String,
}

impl ProcessOutput {
    /// Turn an unsuccessful exit into [`AdminError::Relay`]
    ///
    /// The diagnostic text is stderr, or stdout when stderr is empty.
    pub fn into_checked(self, program: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }

        let status = match self.code {
            Some(code) => format!("exit code {}", code),
            None => "termination by signal".to_string(),
        };
        let diagnostic = if self.stderr.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            self.stderr.trim().to_string()
        };

        Err(AdminError::Relay {
            program: program.to_string(),
            status,
            stderr: diagnostic,
        }
        .into())
    }
}

/// Runs external programs
///
/// The HTTP layer only talks to relays through this trait, which lets tests
/// substitute canned process output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion and capture its output
    ///
    /// A non-zero exit is not an error at this level; see
    /// [`ProcessOutput::into_checked`].
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput>;
}

/// [`CommandRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!(
            program = %invocation.program,
            argc = invocation.args.len(),
            "spawning relay process"
        );

        let output = match invocation.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(program = %invocation.program, ?limit, "relay process timed out");
                    return Err(AdminError::RelayTimeout {
                        program: invocation.program.clone(),
                        seconds: limit.as_secs(),
                    }
                    .into());
                }
            },
            None => cmd.output().await,
        };

        let output = output.map_err(|e| AdminError::Relay {
            program: invocation.program.clone(),
            status: "spawn failure".to_string(),
            stderr: e.to_string(),
        })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Convert a configured timeout in seconds, where 0 disables the timeout
pub(crate) fn timeout_from_secs(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}
