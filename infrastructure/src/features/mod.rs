//! Flags file adapters: the tfvars codec and the file-backed store.

pub mod file_store;
pub mod tfvars;

pub use file_store::{DEFAULT_FEATURES_FILE, TfvarsFileStore};
pub use tfvars::TfvarsCodec;
