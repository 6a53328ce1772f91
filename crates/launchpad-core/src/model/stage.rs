//! リポジトリに公開するデプロイステージ設定

use super::environment::Environment;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 所有テナント名を保持するリポジトリ変数
pub const TENANT_NAME_VAR: &str = "TENANT_NAME";

/// デプロイステージごとのリポジトリ変数名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageVarName {
    FastFeedback,
    ExtendedTest,
    Prod,
}

impl StageVarName {
    /// 公開順の全ステージ
    pub const ALL: [StageVarName; 3] = [Self::FastFeedback, Self::ExtendedTest, Self::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FastFeedback => "FAST_FEEDBACK",
            Self::ExtendedTest => "EXTENDED_TEST",
            Self::Prod => "PROD",
        }
    }
}

impl fmt::Display for StageVarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTarget {
    pub deploy_env: String,
}

/// 1ステージのデプロイ先環境（CIのジョブマトリクスとして使われる）
///
/// ターゲットがない場合 `include` は出力しない。
/// 下流のワークフローはフィールドの有無で判定する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRepositoryConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<StageTarget>,
}

impl StageRepositoryConfig {
    /// 環境の順序を保ったままターゲット一覧を作成
    pub fn from_environments(environments: &[Environment]) -> Self {
        Self {
            include: environments
                .iter()
                .map(|env| StageTarget {
                    deploy_env: env.name().to_string(),
                })
                .collect(),
        }
    }

    /// リポジトリ変数に格納するシリアライズ形式
    pub fn to_variable_value(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
