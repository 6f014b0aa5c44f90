//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 4000
//!
//! [repository]
//! root = "."
//! features_file = "features.auto.tfvars"
//!
//! [publish]
//! command = "commit_gh"
//! on_update = false
//!
//! [logging]
//! file = "/var/log/flag-panel.log"
//! ```

use crate::features::file_store::DEFAULT_FEATURES_FILE;
use crate::publish::command::DEFAULT_PUBLISH_COMMAND;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("server.port cannot be 0")]
    InvalidPort,

    #[error("publish.command cannot be empty")]
    EmptyPublishCommand,

    #[error("repository.features_file cannot be empty")]
    EmptyFeaturesFile,
}

/// Raw server configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

/// Raw repository configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRepositoryConfig {
    /// Repository root; working directory for publish and git commands
    pub root: PathBuf,
    /// Flags file, relative to `root` unless absolute
    pub features_file: PathBuf,
}

impl Default for FileRepositoryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            features_file: PathBuf::from(DEFAULT_FEATURES_FILE),
        }
    }
}

impl FileRepositoryConfig {
    /// Absolute-or-root-relative path to the flags file.
    pub fn features_path(&self) -> PathBuf {
        if self.features_file.is_absolute() {
            self.features_file.clone()
        } else {
            self.root.join(&self.features_file)
        }
    }
}

/// Raw publish configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePublishConfig {
    /// Command looked up on PATH, then in the repository root
    pub command: String,
    /// Publish immediately after every successful flag update
    pub on_update: bool,
}

impl Default for FilePublishConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_PUBLISH_COMMAND.to_string(),
            on_update: false,
        }
    }
}

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write logs to this file
    pub file: Option<PathBuf>,
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub repository: FileRepositoryConfig,
    pub publish: FilePublishConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }
        if self.publish.command.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPublishCommand);
        }
        if self.repository.features_file.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyFeaturesFile);
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn repo_root(&self) -> &Path {
        &self.repository.root
    }
}
