//! Flag store port.
//!
//! Abstracts the persisted flags file so use cases never touch the
//! filesystem directly. The file-backed adapter lives in the
//! infrastructure layer; [`InMemoryFlagStore`] is provided here for tests
//! and dry runs.
//!
//! # Contract
//!
//! - `read` never fails. A missing or unreadable backing file means
//!   "every flag at its default".
//! - `write` replaces the stored flags in full. Failures propagate.
//! - There is no locking between `read` and `write`; concurrent updates
//!   race and the last writer wins.

use async_trait::async_trait;
use flagpanel_domain::FlagSet;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur while persisting flags
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the current [`FlagSet`].
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Load the current flags, falling back to defaults.
    async fn read(&self) -> FlagSet;

    /// Overwrite the stored flags.
    async fn write(&self, flags: &FlagSet) -> Result<(), StoreError>;

    /// Human-readable location of the backing storage (for logs and `/meta`).
    fn location(&self) -> String;
}

/// Flag store held in memory.
///
/// Starts empty (reads return defaults) unless seeded. Can be switched to
/// reject writes to exercise error paths.
#[derive(Default)]
pub struct InMemoryFlagStore {
    stored: Mutex<Option<FlagSet>>,
    writes: Mutex<usize>,
    reject_writes: bool,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(flags: FlagSet) -> Self {
        Self {
            stored: Mutex::new(Some(flags)),
            ..Self::default()
        }
    }

    /// A store whose every `write` fails.
    pub fn read_only() -> Self {
        Self {
            reject_writes: true,
            ..Self::default()
        }
    }

    /// What was last written (or seeded), if anything.
    pub async fn stored(&self) -> Option<FlagSet> {
        self.stored.lock().await.clone()
    }

    /// Number of successful writes.
    pub async fn write_count(&self) -> usize {
        *self.writes.lock().await
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn read(&self) -> FlagSet {
        self.stored.lock().await.clone().unwrap_or_default()
    }

    async fn write(&self, flags: &FlagSet) -> Result<(), StoreError> {
        if self.reject_writes {
            return Err(StoreError::Unavailable("store is read-only".to_string()));
        }
        *self.stored.lock().await = Some(flags.clone());
        *self.writes.lock().await += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
