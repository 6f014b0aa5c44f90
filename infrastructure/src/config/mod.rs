//! Configuration file loading for flag-panel
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `FLAG_PANEL_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./flag-panel.toml` or `./.flag-panel.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/flag-panel/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top by the binary.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLoggingConfig, FilePublishConfig,
    FileRepositoryConfig, FileServerConfig,
};
pub use loader::{ConfigLoader, ConfigSource, ENV_PREFIX};
