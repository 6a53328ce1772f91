//! Launchpad git primitives
//!
//! The onboarding pipeline consumes version control as a handful of atomic
//! operations, each of which either succeeds or fails as a whole:
//!
//! - `init(path)` creates an empty repository on the `main` branch
//! - `add_all(path)` stages every file in the worktree
//! - `commit(path, message)` records a commit
//! - `set_remote(path, url)` attaches the `origin` remote
//! - `push(path)` publishes the current branch to `origin`
//!
//! [`VersionControl`] is the capability seam; [`GitCli`] drives the `git`
//! binary.

pub mod cli;
pub mod error;

use async_trait::async_trait;
use std::path::Path;

pub use cli::GitCli;
pub use error::{GitError, Result};

pub const MAIN_BRANCH: &str = "main";
pub const ORIGIN_REMOTE: &str = "origin";

/// Version-control primitives used by the onboarding pipeline
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Initialize an empty repository in an existing directory
    async fn init(&self, path: &Path) -> Result<()>;

    /// Stage every file present in the worktree
    async fn add_all(&self, path: &Path) -> Result<()>;

    /// Record a commit of the staged changes
    async fn commit(&self, path: &Path, message: &str) -> Result<()>;

    /// Attach `url` as the `origin` remote
    async fn set_remote(&self, path: &Path, url: &str) -> Result<()>;

    /// Push the current branch and its history to `origin`
    async fn push(&self, path: &Path) -> Result<()>;
}
