use crate::config::models::AppConfig;
use crate::core::error::{ApiError, ConfigError};
use crate::core::types::{
    ApplicationModule, EntityPage, EntityRef, ModuleSelector, Release, ReleaseSelector,
    TestVersion, TestVersionFilter,
};
use async_trait::async_trait;
use std::path::Path;

/// Read/update access to the Octane workspace collections this job touches.
#[async_trait]
pub(crate) trait OctaneApi: Send + Sync {
    async fn find_releases(&self, selector: &ReleaseSelector) -> Result<Vec<Release>, ApiError>;

    async fn find_application_modules(
        &self,
        selector: &ModuleSelector,
    ) -> Result<Vec<ApplicationModule>, ApiError>;

    async fn fetch_test_versions(
        &self,
        filter: &TestVersionFilter,
        offset: u64,
        limit: usize,
    ) -> Result<EntityPage<TestVersion>, ApiError>;

    async fn update_test_version_releases(
        &self,
        test_version_id: &str,
        releases: &[EntityRef],
    ) -> Result<(), ApiError>;
}

pub(crate) trait ConfigurationStore: Send + Sync {
    fn load_app_config_file(&self, path: &Path) -> Result<AppConfig, ConfigError>;
}
