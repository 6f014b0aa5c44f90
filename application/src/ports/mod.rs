//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod change_publisher;
pub mod flag_store;
pub mod repo_metadata;
