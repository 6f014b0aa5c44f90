//! Infrastructure layer for flag-panel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod features;
pub mod git;
pub mod publish;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use features::{TfvarsCodec, TfvarsFileStore};
pub use git::GitRepoMetadata;
pub use publish::{CommandPublisher, Program, PublishStrategy};
