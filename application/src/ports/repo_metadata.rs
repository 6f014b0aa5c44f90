//! Repository metadata port.
//!
//! Read-only information about the repository that holds the flags file,
//! shown next to the flags so the operator knows which branch a publish
//! will land on.

use async_trait::async_trait;
use serde::Serialize;

/// Placeholder used when a field cannot be determined.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoMeta {
    pub branch: String,
    pub last_commit: String,
    pub features_file: String,
}

impl RepoMeta {
    pub fn unknown(features_file: impl Into<String>) -> Self {
        Self {
            branch: UNKNOWN.to_string(),
            last_commit: UNKNOWN.to_string(),
            features_file: features_file.into(),
        }
    }
}

/// Port for describing the repository.
///
/// Implementations never fail: anything they cannot determine is reported
/// as [`UNKNOWN`].
#[async_trait]
pub trait RepoMetadataPort: Send + Sync {
    async fn describe(&self) -> RepoMeta;
}
