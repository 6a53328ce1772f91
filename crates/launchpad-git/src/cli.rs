//! git CLI wrapper
//!
//! Runs the `git` binary as a subprocess for every primitive.

use crate::error::{GitError, Result};
use crate::{MAIN_BRANCH, ORIGIN_REMOTE, VersionControl};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;

/// `VersionControl` backed by the git CLI
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    /// `-c key=value` pairs passed to every invocation
    config: Vec<(String, String)>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            config: Vec::new(),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Add a configuration override (e.g. `user.name`) for every command
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.push((key.into(), value.into()));
        self
    }

    /// Return the installed git version, failing if git is unavailable
    pub async fn check_installed(&self) -> Result<String> {
        let output = self.spawn(None, &["--version"]).await?;
        if !output.status.success() {
            return Err(GitError::GitNotFound);
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether HEAD points at a commit
    pub async fn has_commits(&self, path: &Path) -> Result<bool> {
        let output = self
            .spawn(Some(path), &["rev-parse", "--verify", "--quiet", "HEAD"])
            .await?;
        Ok(output.status.success())
    }

    pub async fn current_branch(&self, path: &Path) -> Result<String> {
        let branch = self
            .run_command(path, &["symbolic-ref", "--short", "HEAD"])
            .await?;
        Ok(branch.trim().to_string())
    }

    async fn spawn(&self, path: Option<&Path>, args: &[&str]) -> Result<Output> {
        let mut cmd = Command::new(&self.program);
        if let Some(path) = path {
            cmd.arg("-C").arg(path);
        }
        for (key, value) in &self.config {
            cmd.arg("-c").arg(format!("{}={}", key, value));
        }
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => GitError::GitNotFound,
            _ => GitError::Io(e),
        })
    }

    /// Run a git command in `path` and return stdout
    async fn run_command(&self, path: &Path, args: &[&str]) -> Result<String> {
        let output = self.spawn(Some(path), args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn init(&self, path: &Path) -> Result<()> {
        if path.join(".git").exists() {
            return Err(GitError::AlreadyInitialized(path.to_path_buf()));
        }
        let branch_arg = format!("--initial-branch={}", MAIN_BRANCH);
        self.run_command(path, &["init", branch_arg.as_str()])
            .await?;
        Ok(())
    }

    async fn add_all(&self, path: &Path) -> Result<()> {
        self.run_command(path, &["add", "--all"]).await?;
        Ok(())
    }

    async fn commit(&self, path: &Path, message: &str) -> Result<()> {
        self.run_command(path, &["commit", "--message", message])
            .await?;
        Ok(())
    }

    async fn set_remote(&self, path: &Path, url: &str) -> Result<()> {
        self.run_command(path, &["remote", "add", ORIGIN_REMOTE, url])
            .await?;
        Ok(())
    }

    async fn push(&self, path: &Path) -> Result<()> {
        // An unborn branch has nothing to send; the remote stays empty.
        if !self.has_commits(path).await? {
            tracing::debug!(path = %path.display(), "No commits yet, nothing to push");
            return Ok(());
        }
        let branch = self.current_branch(path).await?;
        self.run_command(
            path,
            &["push", "--set-upstream", ORIGIN_REMOTE, branch.as_str()],
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_reports_git_not_found() {
        let git = GitCli::new().with_program("launchpad-no-such-git-binary");
        let err = git.check_installed().await.unwrap_err();
        assert!(matches!(err, GitError::GitNotFound));
    }

    #[tokio::test]
    async fn test_init_rejects_existing_repository() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let err = GitCli::new().init(temp_dir.path()).await.unwrap_err();
        assert!(matches!(err, GitError::AlreadyInitialized(_)));
    }
}
