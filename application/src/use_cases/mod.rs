//! Use cases (application services)

pub mod apply_changes;
pub mod describe_repo;
pub mod get_features;
pub mod update_features;
