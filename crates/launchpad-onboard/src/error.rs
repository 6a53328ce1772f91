//! オンボーディングのエラー型
//!
//! 各バリアントは失敗したステップを表します。
//! 成功済みのステップは取り消さないため、どの外部状態が残り得るかが分かります。

use crate::step::OnboardStep;
use launchpad_core::{CoreError, RepositoryFullname};
use launchpad_git::GitError;
use launchpad_hosting::HostingError;
use launchpad_template::TemplateError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OnboardError {
    #[error("invalid application request: {0}")]
    Validation(String),

    #[error("failed to initialize workspace at {path}")]
    Workspace {
        path: PathBuf,
        #[source]
        source: GitError,
    },

    #[error("failed to render template '{template}'")]
    Template {
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("failed to record the initial commit")]
    Commit(#[source] GitError),

    #[error("failed to create repository {organization}/{name}")]
    RemoteCreate {
        organization: String,
        name: String,
        #[source]
        source: HostingError,
    },

    #[error("failed to attach remote of {repository}")]
    RemoteConfig {
        repository: RepositoryFullname,
        #[source]
        source: GitError,
    },

    #[error("failed to push to {repository}")]
    Push {
        repository: RepositoryFullname,
        #[source]
        source: GitError,
    },

    #[error("failed to publish repository variable {variable} to {repository}")]
    Publish {
        variable: String,
        repository: RepositoryFullname,
        #[source]
        source: PublishFailure,
    },
}

/// 変数公開に失敗した原因
#[derive(Error, Debug)]
pub enum PublishFailure {
    #[error(transparent)]
    Encode(#[from] CoreError),

    #[error(transparent)]
    Platform(#[from] HostingError),
}

impl OnboardError {
    /// 停止したステップ
    pub fn step(&self) -> OnboardStep {
        match self {
            Self::Validation(_) => OnboardStep::Validate,
            Self::Workspace { .. } => OnboardStep::WorkspaceInit,
            Self::Template { .. } => OnboardStep::Materialize,
            Self::Commit(_) => OnboardStep::Commit,
            Self::RemoteCreate { .. } | Self::RemoteConfig { .. } | Self::Push { .. } => {
                OnboardStep::RemoteProvision
            }
            Self::Publish { .. } => OnboardStep::PublishStages,
        }
    }

    /// 失敗前にリモートリポジトリが作成済みか
    pub fn remote_exists(&self) -> bool {
        matches!(
            self,
            Self::RemoteConfig { .. } | Self::Push { .. } | Self::Publish { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;
