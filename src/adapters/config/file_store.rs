use crate::config::models::AppConfig;
use crate::core::error::ConfigError;
use crate::ports::ConfigurationStore;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub(crate) struct JsonFileConfigAdapter;

impl JsonFileConfigAdapter {
    pub(crate) fn new() -> Self {
        Self
    }

    fn read_json_file<T: DeserializeOwned>(&self, file_path: &Path) -> Result<T, ConfigError> {
        debug!("Reading JSON file: {:?}", file_path);
        let file = File::open(file_path).map_err(|e| ConfigError::ReadFile {
            path: file_path.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| ConfigError::Deserialize {
            path: file_path.to_path_buf(),
            source: Box::new(e),
        })
    }
}

impl ConfigurationStore for JsonFileConfigAdapter {
    fn load_app_config_file(&self, path: &Path) -> Result<AppConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::PathNotFound(path.to_path_buf()));
        }
        let config: AppConfig = self.read_json_file(path)?;
        config.validate()?;
        Ok(config)
    }
}
