//! ステージ設定の公開
//!
//! ターゲットのないステージも含め、全ステージの変数を公開します。
//! トランザクションではないため、失敗時もそれまでに公開した変数は残ります。

use crate::error::{OnboardError, PublishFailure, Result};
use launchpad_core::{
    Environment, RepositoryFullname, StageRepositoryConfig, StageVarName, TENANT_NAME_VAR,
};
use launchpad_hosting::{HostingPlatform, RepositoryVariable};
use tracing::{debug, info};

/// 各デプロイステージのターゲット環境
///
/// 同じ環境を複数のステージで使ってもよい。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageEnvironments {
    pub fast_feedback: Vec<Environment>,
    pub extended_test: Vec<Environment>,
    pub prod: Vec<Environment>,
}

impl StageEnvironments {
    pub fn stage(&self, stage: StageVarName) -> &[Environment] {
        match stage {
            StageVarName::FastFeedback => &self.fast_feedback,
            StageVarName::ExtendedTest => &self.extended_test,
            StageVarName::Prod => &self.prod,
        }
    }

    /// 全ステージの全環境（重複を含む）
    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        StageVarName::ALL
            .into_iter()
            .flat_map(move |stage| self.stage(stage).iter())
    }
}

/// FAST_FEEDBACK, EXTENDED_TEST, PROD, TENANT_NAME の順に公開
pub async fn publish_stage_config(
    hosting: &dyn HostingPlatform,
    repository: &RepositoryFullname,
    stages: &StageEnvironments,
    tenant: &str,
) -> Result<()> {
    for stage in StageVarName::ALL {
        let value = StageRepositoryConfig::from_environments(stages.stage(stage))
            .to_variable_value()
            .map_err(|e| publish_error(stage.as_str(), repository, e.into()))?;
        publish_variable(hosting, repository, stage.as_str(), value).await?;
    }

    publish_variable(hosting, repository, TENANT_NAME_VAR, tenant.to_string()).await?;
    info!(repository = %repository, tenant = tenant, "Published stage configuration");
    Ok(())
}

async fn publish_variable(
    hosting: &dyn HostingPlatform,
    repository: &RepositoryFullname,
    name: &str,
    value: String,
) -> Result<()> {
    debug!(repository = %repository, variable = name, value = %value, "Publishing variable");
    hosting
        .create_repository_variable(repository, &RepositoryVariable::new(name, value))
        .await
        .map_err(|e| publish_error(name, repository, e.into()))
}

fn publish_error(
    variable: &str,
    repository: &RepositoryFullname,
    source: PublishFailure,
) -> OnboardError {
    OnboardError::Publish {
        variable: variable.to_string(),
        repository: repository.clone(),
        source,
    }
}
