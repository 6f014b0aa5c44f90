//! Presentation layer for flag-panel
//!
//! This crate contains CLI definitions and the HTTP API.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, build_router};
