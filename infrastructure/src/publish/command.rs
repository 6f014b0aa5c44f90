//! Command-based change publisher.
//!
//! Runs an ordered list of [`PublishStrategy`] entries and returns the
//! output of the first one that exits successfully. The usual list is
//! built by [`CommandPublisher::with_fallback`]:
//!
//! 1. `commit_gh` (or the configured name) looked up on `PATH`
//! 2. the same-named script in the repository root
//!
//! Both run with the repository root as working directory. Output is
//! captured verbatim. There is no timeout and no retry beyond the list.

use async_trait::async_trait;
use flagpanel_application::ports::change_publisher::{
    AttemptFailure, ChangePublisher, PublishError, PublishOutput,
};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Default publish command name.
pub const DEFAULT_PUBLISH_COMMAND: &str = "commit_gh";

/// How to locate the program for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Program {
    /// Resolve by name on `PATH`.
    Search(String),
    /// Run this exact file.
    File(PathBuf),
}

/// One way of running the publish command.
#[derive(Debug, Clone)]
pub struct PublishStrategy {
    pub label: String,
    pub program: Program,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl PublishStrategy {
    pub fn new(label: impl Into<String>, program: Program, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            program,
            args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn resolve(&self) -> Result<PathBuf, String> {
        match &self.program {
            Program::Search(name) => {
                which::which(name).map_err(|e| format!("{} not found on PATH: {}", name, e))
            }
            Program::File(path) => Ok(path.clone()),
        }
    }
}

/// Publisher that tries each strategy in order.
pub struct CommandPublisher {
    strategies: Vec<PublishStrategy>,
}

impl CommandPublisher {
    pub fn new(strategies: Vec<PublishStrategy>) -> Self {
        Self { strategies }
    }

    /// `command` on `PATH`, then `repo_root/command`.
    ///
    /// On Windows the repository script is run through `sh`, since it
    /// cannot be executed directly.
    pub fn with_fallback(command: &str, repo_root: impl AsRef<Path>) -> Self {
        let repo_root = repo_root.as_ref();

        let primary = PublishStrategy::new("path", Program::Search(command.to_string()), repo_root);
        let fallback = repo_script(command, repo_root, cfg!(target_os = "windows"));

        Self::new(vec![primary, fallback])
    }

    pub fn strategies(&self) -> &[PublishStrategy] {
        &self.strategies
    }

    async fn run(strategy: &PublishStrategy) -> Result<PublishOutput, String> {
        let program = strategy.resolve()?;
        debug!(
            "Running {} {:?} in {}",
            program.display(),
            strategy.args,
            strategy.working_dir.display()
        );

        let output = Command::new(&program)
            .args(&strategy.args)
            .current_dir(&strategy.working_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", program.display(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            let detail = stderr.trim();
            return Err(if detail.is_empty() {
                format!("exited with status {}", code)
            } else {
                format!("exited with status {}: {}", code, detail)
            });
        }

        Ok(PublishOutput {
            attempt: strategy.label.clone(),
            stdout,
            stderr,
        })
    }
}

#[async_trait]
impl ChangePublisher for CommandPublisher {
    async fn publish(&self) -> Result<PublishOutput, PublishError> {
        if self.strategies.is_empty() {
            return Err(PublishError::NoStrategies);
        }

        let mut failures = Vec::new();

        for strategy in &self.strategies {
            match Self::run(strategy).await {
                Ok(output) => {
                    if !output.stderr.trim().is_empty() {
                        warn!("{} stderr: {}", strategy.label, output.stderr.trim());
                    }
                    info!("{} stdout: {}", strategy.label, output.stdout.trim());
                    return Ok(output);
                }
                Err(reason) => {
                    warn!("Publish attempt {} failed: {}", strategy.label, reason);
                    failures.push(AttemptFailure {
                        attempt: strategy.label.clone(),
                        reason,
                    });
                }
            }
        }

        Err(PublishError::AllAttemptsFailed(failures))
    }
}

fn repo_script(command: &str, repo_root: &Path, via_shell: bool) -> PublishStrategy {
    if via_shell {
        PublishStrategy::new("repo-script", Program::Search("sh".to_string()), repo_root)
            .with_args([command])
    } else {
        PublishStrategy::new("repo-script", Program::File(repo_root.join(command)), repo_root)
    }
}
