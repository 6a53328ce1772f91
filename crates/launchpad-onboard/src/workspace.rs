//! ワークスペースの初期化と初回コミット

use crate::error::{OnboardError, Result};
use launchpad_git::{GitError, VersionControl};
use std::path::Path;
use tracing::{debug, info};

/// 初回コミットのメッセージ（まだデプロイ対象がないのでCIはスキップ）
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit\n[skip ci]";

/// ワークスペースディレクトリを作成し、空のリポジトリを初期化
pub async fn init_workspace(vcs: &dyn VersionControl, path: &Path) -> Result<()> {
    let workspace_error = |source: GitError| OnboardError::Workspace {
        path: path.to_path_buf(),
        source,
    };

    let mut builder = tokio::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder
        .create(path)
        .await
        .map_err(|e| workspace_error(GitError::Io(e)))?;
    debug!(path = %path.display(), "Workspace directory ready");

    vcs.init(path).await.map_err(workspace_error)?;
    info!(path = %path.display(), "Initialized workspace repository");
    Ok(())
}

/// ワークスペースの全ファイルをステージして初回コミット
pub async fn commit_workspace(vcs: &dyn VersionControl, path: &Path) -> Result<()> {
    vcs.add_all(path).await.map_err(OnboardError::Commit)?;
    vcs.commit(path, INITIAL_COMMIT_MESSAGE)
        .await
        .map_err(OnboardError::Commit)?;
    info!(path = %path.display(), "Recorded initial commit");
    Ok(())
}
