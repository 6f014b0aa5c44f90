//! Apply Changes use case
//!
//! Runs the publish step on whatever is currently in the flags file.

use crate::ports::change_publisher::{ChangePublisher, PublishError, PublishOutput};
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for committing and pushing the flags file
pub struct ApplyChangesUseCase {
    publisher: Arc<dyn ChangePublisher>,
}

impl ApplyChangesUseCase {
    pub fn new(publisher: Arc<dyn ChangePublisher>) -> Self {
        Self { publisher }
    }

    pub async fn execute(&self) -> Result<PublishOutput, PublishError> {
        info!("Publishing flag changes");
        match self.publisher.publish().await {
            Ok(output) => {
                info!("Publish succeeded via {}", output.attempt);
                Ok(output)
            }
            Err(e) => {
                warn!("Publish failed: {}", e);
                Err(e)
            }
        }
    }
}
