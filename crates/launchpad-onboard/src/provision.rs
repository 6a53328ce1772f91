//! リモートリポジトリの作成

use crate::error::{OnboardError, Result};
use launchpad_core::RepositoryFullname;
use launchpad_git::VersionControl;
use launchpad_hosting::{CreateRepositoryRequest, HostingPlatform};
use std::path::Path;
use tracing::info;

/// リモートリポジトリを作成し、`origin` として設定してプッシュ
///
/// 返す識別子はホスティング側のレスポンスから取得する（名前が正規化される場合がある）。
/// リモート設定やプッシュに失敗しても、作成したリポジトリは削除しない。
pub async fn provision_remote(
    hosting: &dyn HostingPlatform,
    vcs: &dyn VersionControl,
    organization: &str,
    request: &CreateRepositoryRequest,
    path: &Path,
) -> Result<RepositoryFullname> {
    let record = hosting
        .create_repository(organization, request)
        .await
        .map_err(|source| OnboardError::RemoteCreate {
            organization: organization.to_string(),
            name: request.name.clone(),
            source,
        })?;
    let repository = record.full_name();
    info!(
        platform = hosting.name(),
        repository = %repository,
        "Remote repository created"
    );

    vcs.set_remote(path, &record.ssh_url)
        .await
        .map_err(|source| OnboardError::RemoteConfig {
            repository: repository.clone(),
            source,
        })?;

    vcs.push(path)
        .await
        .map_err(|source| OnboardError::Push {
            repository: repository.clone(),
            source,
        })?;
    info!(repository = %repository, "Pushed workspace");

    Ok(repository)
}
