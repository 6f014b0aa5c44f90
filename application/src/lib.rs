//! Application layer for flag-panel
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    change_publisher::{AttemptFailure, ChangePublisher, PublishError, PublishOutput},
    flag_store::{FlagStore, InMemoryFlagStore, StoreError},
    repo_metadata::{RepoMeta, RepoMetadataPort},
};
pub use use_cases::apply_changes::ApplyChangesUseCase;
pub use use_cases::describe_repo::DescribeRepoUseCase;
pub use use_cases::get_features::GetFeaturesUseCase;
pub use use_cases::update_features::{
    UpdateFeaturesError, UpdateFeaturesInput, UpdateFeaturesOutput, UpdateFeaturesUseCase,
};
