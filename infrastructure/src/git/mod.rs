//! Git adapters

pub mod metadata;

pub use metadata::GitRepoMetadata;
