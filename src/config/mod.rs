pub(crate) mod models;

use crate::core::error::ConfigError;
use std::path::{Path, PathBuf};

pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "relmark_config.json";

pub(crate) fn find_config_file() -> Result<PathBuf, ConfigError> {
    let current_dir_path = Path::new(".").join(DEFAULT_CONFIG_FILE_NAME);
    if current_dir_path.exists() {
        return Ok(current_dir_path);
    }

    if let Some(user_config_dir) = dirs::config_dir() {
        let user_config_path = user_config_dir
            .join("relmark")
            .join(DEFAULT_CONFIG_FILE_NAME);
        return Ok(user_config_path);
    }
    Ok(current_dir_path)
}
