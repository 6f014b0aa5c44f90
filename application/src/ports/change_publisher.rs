//! Change publisher port.
//!
//! Publishing hands the edited flags file to an external command that
//! commits and pushes it, so the infrastructure pipeline picks up the
//! change. What the command does is opaque here: the port only promises
//! "run it, capture output, report success or failure".

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Captured output of the attempt that succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutput {
    /// Label of the strategy that succeeded (e.g. `"path"`, `"repo-script"`).
    pub attempt: String,
    pub stdout: String,
    pub stderr: String,
}

/// Why a single publish attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub attempt: String,
    pub reason: String,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attempt, self.reason)
    }
}

/// Errors that can occur while publishing
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("No publish strategy configured")]
    NoStrategies,

    #[error("All publish attempts failed ({})", join_failures(.0))]
    AllAttemptsFailed(Vec<AttemptFailure>),
}

fn join_failures(failures: &[AttemptFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Port for committing and pushing the flags file.
#[async_trait]
pub trait ChangePublisher: Send + Sync {
    /// Run the publish step and capture its output.
    ///
    /// Blocks until the external command finishes. There is no timeout.
    async fn publish(&self) -> Result<PublishOutput, PublishError>;
}
