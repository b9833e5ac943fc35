use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use url::Url;

fn default_max_page_size() -> usize {
    20000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppConfig {
    pub server: ServerConfig,
    pub authentication: AuthCredentials,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub app_module: Option<String>,
    #[serde(default)]
    pub use_strict_app_module: bool,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default)]
    pub version_to_update: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "maxPageSize".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.server.shared_space_id == 0 || self.server.workspace_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server".to_string(),
                message: "shared_space_id and workspace_id must be set".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServerConfig {
    pub url: Url,
    #[serde(default)]
    pub shared_space_id: u64,
    #[serde(default)]
    pub workspace_id: u64,
}

/// Body of the Octane `sign_in` request. The two variants mirror the two
/// credential kinds the platform accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum AuthCredentials {
    ApiKey {
        client_id: String,
        client_secret: String,
    },
    Basic {
        user: String,
        password: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Compact
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}
