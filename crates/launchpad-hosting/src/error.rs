//! Hosting platform error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostingError {
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl HostingError {
    /// HTTP status returned by the platform, if the request reached it
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HostingError>;
