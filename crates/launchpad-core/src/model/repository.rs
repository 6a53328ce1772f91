//! リモートリポジトリの識別子

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const GITHUB_WEB_BASE: &str = "https://github.com";

/// ホスティング側が受け付けるリポジトリ名の最大長
pub const MAX_REPOSITORY_NAME_LEN: usize = 100;

/// リモートリポジトリの正規化された (organization, name) の組
///
/// 要求した名前が正規化されることがあるため、常にホスティング側のレスポンスから作る。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryFullname {
    pub organization: String,
    pub name: String,
}

impl RepositoryFullname {
    pub fn new(organization: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            name: name.into(),
        }
    }

    pub fn http_url(&self) -> String {
        format!("{}/{}/{}", GITHUB_WEB_BASE, self.organization, self.name)
    }

    pub fn actions_http_url(&self) -> String {
        format!("{}/actions", self.http_url())
    }
}

impl fmt::Display for RepositoryFullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.name)
    }
}

/// `name` がリポジトリ名として使えるか検証
pub fn validate_repository_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| CoreError::InvalidName {
        kind: "repository name",
        value: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.len() > MAX_REPOSITORY_NAME_LEN {
        return Err(invalid("must be at most 100 characters"));
    }
    if name == "." || name == ".." {
        return Err(invalid("is reserved"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(invalid(
            "may only contain ASCII letters, digits, '-', '_' and '.'",
        ));
    }
    Ok(())
}
