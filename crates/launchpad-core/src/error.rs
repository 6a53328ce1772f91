use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {path}\nreason: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("discovery error: {path}\nreason: {message}")]
    DiscoveryError { path: PathBuf, message: String },

    #[error("environment '{name}' is invalid: {reason}")]
    InvalidEnvironment { name: String, reason: String },

    #[error(
        "environment not found: {0}\nhint: check the environments directory of the platform repository"
    )]
    EnvironmentNotFound(String),

    #[error("invalid {kind} '{value}': {reason}")]
    InvalidName {
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
