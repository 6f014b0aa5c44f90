//! File-backed flag store.
//!
//! Implements [`FlagStore`] over a single tfvars file. Every read goes to
//! disk; nothing is cached between calls. Writes truncate and rewrite the
//! whole file in place (no temp file, no rename, no lock).

use super::tfvars::TfvarsCodec;
use async_trait::async_trait;
use flagpanel_application::ports::flag_store::{FlagStore, StoreError};
use flagpanel_domain::FlagSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default file name, relative to the repository root.
pub const DEFAULT_FEATURES_FILE: &str = "features.auto.tfvars";

pub struct TfvarsFileStore {
    path: PathBuf,
    codec: TfvarsCodec,
}

impl TfvarsFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, regex::Error> {
        Ok(Self {
            path: path.into(),
            codec: TfvarsCodec::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FlagStore for TfvarsFileStore {
    async fn read(&self) -> FlagSet {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                debug!("Loaded {} ({} bytes)", self.path.display(), content.len());
                self.codec.parse(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} does not exist yet, using defaults", self.path.display());
                FlagSet::defaults()
            }
            Err(e) => {
                warn!(
                    "Could not read {}: {}; using defaults",
                    self.path.display(),
                    e
                );
                FlagSet::defaults()
            }
        }
    }

    async fn write(&self, flags: &FlagSet) -> Result<(), StoreError> {
        let content = self.codec.render(flags);
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        info!("Wrote {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
