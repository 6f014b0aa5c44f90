//! Shared handler state

use flagpanel_application::{
    ApplyChangesUseCase, ChangePublisher, DescribeRepoUseCase, FlagStore, GetFeaturesUseCase,
    RepoMetadataPort, UpdateFeaturesUseCase,
};
use std::sync::Arc;

/// Use cases shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub get_features: Arc<GetFeaturesUseCase>,
    pub update_features: Arc<UpdateFeaturesUseCase>,
    pub apply_changes: Arc<ApplyChangesUseCase>,
    pub describe_repo: Arc<DescribeRepoUseCase>,
    /// Run the publish step as part of `POST /features`
    pub publish_on_update: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn FlagStore>,
        publisher: Arc<dyn ChangePublisher>,
        metadata: Arc<dyn RepoMetadataPort>,
    ) -> Self {
        Self {
            get_features: Arc::new(GetFeaturesUseCase::new(store.clone())),
            update_features: Arc::new(
                UpdateFeaturesUseCase::new(store).with_publisher(publisher.clone()),
            ),
            apply_changes: Arc::new(ApplyChangesUseCase::new(publisher)),
            describe_repo: Arc::new(DescribeRepoUseCase::new(metadata)),
            publish_on_update: false,
        }
    }

    pub fn with_publish_on_update(mut self, enabled: bool) -> Self {
        self.publish_on_update = enabled;
        self
    }
}
