//! Git metadata for the repository holding the flags file.
//!
//! Pure passthrough of `git rev-parse` / `git log` output. Any failure
//! (git missing, not a repository, no commits yet) degrades to
//! `"unknown"` rather than an error.

use async_trait::async_trait;
use flagpanel_application::ports::repo_metadata::{RepoMeta, RepoMetadataPort};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::warn;

pub struct GitRepoMetadata {
    repo_root: PathBuf,
    features_file: PathBuf,
}

impl GitRepoMetadata {
    pub fn new(repo_root: impl Into<PathBuf>, features_file: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            features_file: features_file.into(),
        }
    }

    async fn git(&self, args: &[&str]) -> Result<String, String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .await
            .map_err(|e| format!("failed to run git: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git {} failed: {}", args.join(" "), stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl RepoMetadataPort for GitRepoMetadata {
    async fn describe(&self) -> RepoMeta {
        let features_file = self.features_file.display().to_string();

        let branch = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).await;
        let last_commit = self
            .git(&["log", "-1", "--pretty=format:%h%x20%an%x20%ad%x20%s"])
            .await;

        match (branch, last_commit) {
            (Ok(branch), Ok(last_commit)) => RepoMeta {
                branch,
                last_commit,
                features_file,
            },
            (Err(e), _) | (_, Err(e)) => {
                warn!("Failed to read git metadata: {}", e);
                RepoMeta::unknown(features_file)
            }
        }
    }
}
