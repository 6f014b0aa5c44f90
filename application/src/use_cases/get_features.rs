//! Get Features use case

use crate::ports::flag_store::FlagStore;
use flagpanel_domain::FlagSet;
use std::sync::Arc;
use tracing::debug;

/// Use case for reading the current flags
pub struct GetFeaturesUseCase {
    store: Arc<dyn FlagStore>,
}

impl GetFeaturesUseCase {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> FlagSet {
        debug!("Reading flags from {}", self.store.location());
        self.store.read().await
    }
}
