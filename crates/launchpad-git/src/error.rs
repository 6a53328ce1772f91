//! Git error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("git not found. Please install git and make sure it is on PATH")]
    GitNotFound,

    #[error("a git repository already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitError>;
