//! デプロイ先環境の定義

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// 環境のデフォルトとして優先されるイングレスドメイン名
pub const DEFAULT_INGRESS_DOMAIN: &str = "default";

/// プラットフォームリポジトリで宣言されたデプロイ先環境
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// 環境名 (例: "dev", "prod")
    pub environment: String,
    #[serde(default)]
    pub platform: PlatformProject,
    /// 宣言順のイングレスドメイン
    #[serde(default)]
    pub ingress_domains: Vec<Domain>,
    #[serde(default)]
    pub internal_services: Domain,
}

/// 環境に紐づくクラウドプロジェクト
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformProject {
    #[serde(default, deserialize_with = "string_or_number")]
    pub project_id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub project_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: String,
}

impl Domain {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }
}

impl Environment {
    /// 名前のみを持つ環境を作成
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            environment: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.environment
    }

    /// "default" という名前のイングレスドメイン、なければ最初に宣言されたもの
    pub fn default_ingress_domain(&self) -> Option<&Domain> {
        self.ingress_domains
            .iter()
            .find(|d| d.name == DEFAULT_INGRESS_DOMAIN)
            .or_else(|| self.ingress_domains.first())
    }

    /// デプロイに必要な項目が揃っているか検証
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| CoreError::InvalidEnvironment {
            name: self.environment.clone(),
            reason: reason.to_string(),
        };

        if self.environment.is_empty() {
            return Err(invalid("environment is empty"));
        }
        if self.platform.project_id.is_empty() {
            return Err(invalid("projectId is missing"));
        }
        if self.platform.project_number.is_empty() {
            return Err(invalid("projectNumber is missing"));
        }

        let default_domain = self
            .default_ingress_domain()
            .ok_or_else(|| invalid("default ingress domain is not found"))?;
        if default_domain.name.is_empty() {
            return Err(invalid("default ingress domain name is missing"));
        }
        if default_domain.domain.is_empty() {
            return Err(invalid("default ingress domain is missing"));
        }

        if self.internal_services.name.is_empty() {
            return Err(invalid("internalServices name is missing"));
        }
        if self.internal_services.domain.is_empty() {
            return Err(invalid("internalServices domain is missing"));
        }
        Ok(())
    }
}

// YAMLではプロジェクト番号がクォートなしで書かれることが多い
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
