//! テナント定義

use crate::error::{CoreError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// プラットフォーム上でアプリケーションを所有するテナント
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub name: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub cost_centre: String,
    /// デプロイが許可された環境
    #[serde(default)]
    pub environments: Vec<String>,
    /// テナントに登録済みのリポジトリ
    #[serde(default, rename = "repos")]
    pub repositories: Vec<String>,
    #[serde(default)]
    pub admin_group: String,
    #[serde(default)]
    pub readonly_group: String,
}

impl Tenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_tenant_name(&self.name)
    }
}

/// テナント名は Kubernetes の namespace 名としても使われる
pub fn validate_tenant_name(name: &str) -> Result<()> {
    let invalid = || CoreError::InvalidName {
        kind: "tenant name",
        value: name.to_string(),
        reason: "must be a valid K8S namespace name".to_string(),
    };

    let length = name.chars().count();
    if !(1..=63).contains(&length) {
        return Err(invalid());
    }
    let pattern = Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$")?;
    if !pattern.is_match(name) {
        return Err(invalid());
    }
    Ok(())
}
