//! Update Features use case
//!
//! Read-merge-write cycle for the flags file, optionally followed by a
//! publish. The write and the publish are independent steps: a publish
//! failure is reported but the file stays as written.

use crate::ports::change_publisher::{ChangePublisher, PublishError, PublishOutput};
use crate::ports::flag_store::{FlagStore, StoreError};
use flagpanel_domain::FlagSet;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while updating flags
#[derive(Error, Debug)]
pub enum UpdateFeaturesError {
    #[error("Failed to persist flags: {0}")]
    Store(#[from] StoreError),

    /// The flags were written, but publishing them failed.
    #[error("Flags saved but publish failed: {source}")]
    Publish {
        flags: FlagSet,
        #[source]
        source: PublishError,
    },

    #[error("Publishing requested but no publisher is configured")]
    NoPublisher,
}

/// Input for the UpdateFeatures use case
#[derive(Debug, Clone, Default)]
pub struct UpdateFeaturesInput {
    /// Partial update; any subset of schema keys
    pub changes: Map<String, Value>,
    /// Run the publish step after writing
    pub publish: bool,
}

impl UpdateFeaturesInput {
    pub fn new(changes: Map<String, Value>) -> Self {
        Self {
            changes,
            publish: false,
        }
    }

    pub fn and_publish(mut self) -> Self {
        self.publish = true;
        self
    }
}

/// Output of the UpdateFeatures use case
#[derive(Debug, Clone)]
pub struct UpdateFeaturesOutput {
    /// The full flag set as written
    pub flags: FlagSet,
    /// Publish output, when publishing was requested
    pub publish: Option<PublishOutput>,
}

/// Use case for merging a partial update into the stored flags
pub struct UpdateFeaturesUseCase {
    store: Arc<dyn FlagStore>,
    publisher: Option<Arc<dyn ChangePublisher>>,
}

impl UpdateFeaturesUseCase {
    pub fn new(store: Arc<dyn FlagStore>) -> Self {
        Self {
            store,
            publisher: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn ChangePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub async fn execute(
        &self,
        input: UpdateFeaturesInput,
    ) -> Result<UpdateFeaturesOutput, UpdateFeaturesError> {
        if input.publish && self.publisher.is_none() {
            return Err(UpdateFeaturesError::NoPublisher);
        }

        let current = self.store.read().await;

        let ignored = FlagSet::unknown_keys(&input.changes);
        if !ignored.is_empty() {
            debug!("Ignoring unknown keys: {}", ignored.join(", "));
        }

        let next = current.merge(&input.changes);
        let changed = current.changed_keys(&next);
        info!(
            "Writing flags to {} (changed: {})",
            self.store.location(),
            if changed.is_empty() {
                "none".to_string()
            } else {
                changed.join(", ")
            }
        );

        self.store.write(&next).await?;

        let publish = match (&self.publisher, input.publish) {
            (Some(publisher), true) => match publisher.publish().await {
                Ok(output) => Some(output),
                Err(source) => {
                    warn!("Flags written but publish failed: {}", source);
                    return Err(UpdateFeaturesError::Publish {
                        flags: next,
                        source,
                    });
                }
            },
            _ => None,
        };

        Ok(UpdateFeaturesOutput {
            flags: next,
            publish,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::change_publisher::AttemptFailure;
    use crate::ports::flag_store::InMemoryFlagStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockPublisher {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl MockPublisher {
        fn new(succeed: bool) -> Self {
            Self {
                succeed,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChangePublisher for MockPublisher {
        async fn publish(&self) -> Result<PublishOutput, PublishError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(PublishOutput {
                    attempt: "mock".to_string(),
                    stdout: "pushed".to_string(),
                    stderr: String::new(),
                })
            } else {
                Err(PublishError::AllAttemptsFailed(vec![AttemptFailure {
                    attempt: "mock".to_string(),
                    reason: "remote rejected".to_string(),
                }]))
            }
        }
    }

    fn changes(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_update_merges_and_writes() {
        let store = Arc::new(InMemoryFlagStore::new());
        let use_case = UpdateFeaturesUseCase::new(store.clone());

        let output = use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"enable_vpc": true}))))
            .await
            .unwrap();

        assert_eq!(output.flags.toggle("enable_vpc"), Some(true));
        assert!(output.publish.is_none());
        assert_eq!(store.stored().await, Some(output.flags));
    }

    #[tokio::test]
    async fn test_update_starts_from_stored_flags() {
        let seeded = FlagSet::defaults().with("instance_count", 6_i64).unwrap();
        let store = Arc::new(InMemoryFlagStore::seeded(seeded));
        let use_case = UpdateFeaturesUseCase::new(store.clone());

        let output = use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"os_type": "ubuntu"}))))
            .await
            .unwrap();

        assert_eq!(output.flags.count("instance_count"), Some(6));
        assert_eq!(output.flags.choice("os_type"), Some("ubuntu"));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let use_case = UpdateFeaturesUseCase::new(Arc::new(InMemoryFlagStore::read_only()));
        let err = use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"enable_iam": false}))))
            .await
            .unwrap_err();
        assert!(matches!(err, UpdateFeaturesError::Store(_)));
    }

    #[tokio::test]
    async fn test_publish_after_write() {
        let store = Arc::new(InMemoryFlagStore::new());
        let publisher = Arc::new(MockPublisher::new(true));
        let use_case = UpdateFeaturesUseCase::new(store.clone()).with_publisher(publisher.clone());

        let output = use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"enable_alb": false}))).and_publish())
            .await
            .unwrap();

        assert_eq!(output.publish.unwrap().stdout, "pushed");
        assert_eq!(publisher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.write_count().await, 1);
    }

    #[tokio::test]
    async fn test_publish_failure_keeps_written_flags() {
        let store = Arc::new(InMemoryFlagStore::new());
        let use_case = UpdateFeaturesUseCase::new(store.clone())
            .with_publisher(Arc::new(MockPublisher::new(false)));

        let err = use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"enable_stack": false}))).and_publish())
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateFeaturesError::Publish { .. }));
        let stored = store.stored().await.unwrap();
        assert_eq!(stored.toggle("enable_stack"), Some(false));
    }

    #[tokio::test]
    async fn test_publisher_not_called_unless_requested() {
        let publisher = Arc::new(MockPublisher::new(true));
        let use_case = UpdateFeaturesUseCase::new(Arc::new(InMemoryFlagStore::new()))
            .with_publisher(publisher.clone());

        use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"enable_dns": false}))))
            .await
            .unwrap();

        assert_eq!(publisher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_publish_without_publisher_is_rejected_before_writing() {
        let store = Arc::new(InMemoryFlagStore::new());
        let use_case = UpdateFeaturesUseCase::new(store.clone());

        let err = use_case
            .execute(UpdateFeaturesInput::new(changes(json!({"enable_dns": false}))).and_publish())
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateFeaturesError::NoPublisher));
        assert_eq!(store.write_count().await, 0);
    }
}
