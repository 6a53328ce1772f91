use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("template definition error: {path}\nreason: {source}")]
    Definition {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("template skeleton not found: {0}")]
    SkeletonNotFound(PathBuf),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("template render error: {file}\nreason: {message}")]
    RenderError { file: PathBuf, message: String },

    #[error("rendered path escapes the destination: {0}")]
    InvalidPath(PathBuf),

    #[error("destination already contains {0}")]
    Conflict(PathBuf),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
