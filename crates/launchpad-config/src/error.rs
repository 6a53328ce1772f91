use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration directory not found")]
    ConfigDirNotFound,

    #[error(
        "configuration file not found: {0}\n\
        Create it or point LAUNCHPAD_CONFIG at an existing file"
    )]
    ConfigFileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse error: {path}\nreason: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("missing configuration value '{key}' ({hint})")]
    MissingValue { key: &'static str, hint: &'static str },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
