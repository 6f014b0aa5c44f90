//! HTTP API
//!
//! JSON over HTTP, served with axum. Handlers are thin: they translate
//! requests into use case calls and errors into `{"error": ...}` bodies.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
