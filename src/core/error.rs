use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to deserialize configuration from {path}: {source}")]
    Deserialize {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Configuration file not found: {0}")]
    PathNotFound(PathBuf),
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

#[derive(Error, Debug)]
pub(crate) enum AuthError {
    #[error("Network error during sign-in: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Sign-in rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Insufficient permissions in workspace {workspace_id} (HTTP 403)")]
    Forbidden { workspace_id: u64 },
    #[error("The requested page size was rejected by the server: {body}")]
    PageSizeRejected { body: String },
    #[error("Unexpected HTTP {status} response: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("Failed to decode server response: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub(crate) enum LookupError {
    #[error("No {entity} found with the {field}: {value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("More than one {entity} was found with the {field}: {value}")]
    Ambiguous {
        entity: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("The release '{name}' (id:{id}) cannot be used because it is not active")]
    InactiveRelease { name: String, id: String },
    #[error(
        "Invalid application module parameter. The only supported values are integers or the strings \"unassigned\", \"root\" and \"all\", but got \"{0}\""
    )]
    InvalidModuleArgument(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}
