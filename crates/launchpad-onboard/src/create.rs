//! アプリケーション作成
//!
//! ```text
//! validate → workspace init → [template → commit] → remote provision → publish
//! ```
//!
//! 最初に失敗したステップで終了します。
//! リトライもロールバックも行いません。

use crate::error::{OnboardError, Result};
use crate::provision::provision_remote;
use crate::publish::{StageEnvironments, publish_stage_config};
use crate::step::OnboardStep;
use crate::validate::validate_request;
use crate::workspace::{commit_workspace, init_workspace};
use launchpad_core::{RepositoryFullname, Tenant};
use launchpad_git::VersionControl;
use launchpad_hosting::{CreateRepositoryRequest, HostingPlatform};
use launchpad_template::{FulfilledTemplate, TemplateMaterializer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// アプリケーション1件のオンボーディング要求
#[derive(Debug, Clone)]
pub struct CreateOp {
    /// アプリケーション名
    pub name: String,
    /// アプリケーション名と異なる場合のリモートリポジトリ名
    pub github_repo_name: Option<String>,
    pub description: Option<String>,
    pub organization: String,
    /// ローカルのワークスペースディレクトリ
    pub local_path: PathBuf,
    pub tenant: Tenant,
    pub stages: StageEnvironments,
    pub template: Option<FulfilledTemplate>,
    /// テンプレートディレクトリの基準となるカタログルート
    pub templates_root: PathBuf,
}

impl CreateOp {
    pub fn repository_name(&self) -> &str {
        self.github_repo_name.as_deref().unwrap_or(&self.name)
    }

    fn repository_request(&self) -> CreateRepositoryRequest {
        let request = CreateRepositoryRequest::private(self.repository_name());
        match &self.description {
            Some(description) => request.with_description(description),
            None => request,
        }
    }
}

/// 成功時の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResult {
    pub repository: RepositoryFullname,
    pub local_path: PathBuf,
    /// 初回コミットをプッシュしたか
    pub committed: bool,
}

/// 注入された依存先を使ってオンボーディングを実行
pub struct ApplicationService {
    hosting: Arc<dyn HostingPlatform>,
    vcs: Arc<dyn VersionControl>,
    materializer: Arc<dyn TemplateMaterializer>,
}

impl ApplicationService {
    pub fn new(
        hosting: Arc<dyn HostingPlatform>,
        vcs: Arc<dyn VersionControl>,
        materializer: Arc<dyn TemplateMaterializer>,
    ) -> Self {
        Self {
            hosting,
            vcs,
            materializer,
        }
    }

    pub async fn create(&self, op: CreateOp) -> Result<CreateResult> {
        info!(
            name = %op.name,
            org = %op.organization,
            tenant = %op.tenant.name,
            path = %op.local_path.display(),
            "Creating application"
        );

        log_step(OnboardStep::Validate);
        validate_request(&op)?;

        log_step(OnboardStep::WorkspaceInit);
        init_workspace(self.vcs.as_ref(), &op.local_path).await?;

        let committed = match &op.template {
            Some(template) => {
                log_step(OnboardStep::Materialize);
                self.render_template(&op, template)?;

                log_step(OnboardStep::Commit);
                commit_workspace(self.vcs.as_ref(), &op.local_path).await?;
                true
            }
            None => false,
        };

        log_step(OnboardStep::RemoteProvision);
        let repository = provision_remote(
            self.hosting.as_ref(),
            self.vcs.as_ref(),
            &op.organization,
            &op.repository_request(),
            &op.local_path,
        )
        .await?;

        log_step(OnboardStep::PublishStages);
        publish_stage_config(
            self.hosting.as_ref(),
            &repository,
            &op.stages,
            &op.tenant.name,
        )
        .await?;

        info!(repository = %repository, "Application created");
        Ok(CreateResult {
            repository,
            local_path: op.local_path,
            committed,
        })
    }

    fn render_template(&self, op: &CreateOp, template: &FulfilledTemplate) -> Result<()> {
        // name と tenant は常に要求の値を使う
        let mut template = template.clone();
        template.set_argument("name", op.name.as_str());
        template.set_argument("tenant", op.tenant.name.as_str());

        self.materializer
            .render(&template, &op.templates_root, &op.local_path)
            .map_err(|source| OnboardError::Template {
                template: template.spec.name.clone(),
                source,
            })
    }
}

fn log_step(step: OnboardStep) {
    debug!(step = step.id(), "{}", step.name());
}
