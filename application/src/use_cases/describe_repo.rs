//! Describe Repo use case

use crate::ports::repo_metadata::{RepoMeta, RepoMetadataPort};
use std::sync::Arc;

/// Use case for reading branch and last-commit information
pub struct DescribeRepoUseCase {
    metadata: Arc<dyn RepoMetadataPort>,
}

impl DescribeRepoUseCase {
    pub fn new(metadata: Arc<dyn RepoMetadataPort>) -> Self {
        Self { metadata }
    }

    pub async fn execute(&self) -> RepoMeta {
        self.metadata.describe().await
    }
}
