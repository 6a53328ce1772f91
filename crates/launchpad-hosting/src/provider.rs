//! Hosting platform trait definition

use crate::error::Result;
use async_trait::async_trait;
use launchpad_core::RepositoryFullname;
use serde::{Deserialize, Serialize};

/// Hosting platform capabilities used by the onboarding pipeline
///
/// Kept to the two calls onboarding needs so tests can substitute an
/// in-memory double.
#[async_trait]
pub trait HostingPlatform: Send + Sync {
    /// Returns the platform name (e.g., "github")
    fn name(&self) -> &str;

    /// Create a repository owned by `org`
    async fn create_repository(
        &self,
        org: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryRecord>;

    /// Create a configuration variable scoped to one repository
    async fn create_repository_variable(
        &self,
        repository: &RepositoryFullname,
        variable: &RepositoryVariable,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

/// Repository creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRepositoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub visibility: Visibility,
    pub delete_branch_on_merge: bool,
}

impl CreateRepositoryRequest {
    /// Private repository that deletes head branches once merged
    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            visibility: Visibility::Private,
            delete_branch_on_merge: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Repository as reported by the platform after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    pub owner: RepositoryOwner,
    pub ssh_url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

impl RepositoryRecord {
    /// Canonical identity as normalized by the platform
    pub fn full_name(&self) -> RepositoryFullname {
        RepositoryFullname::new(&self.owner.login, &self.name)
    }
}

/// Repository-scoped configuration variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryVariable {
    pub name: String,
    pub value: String,
}

impl RepositoryVariable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_request_body() {
        let request = CreateRepositoryRequest::private("billing-svc");
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "name": "billing-svc",
                "visibility": "private",
                "delete_branch_on_merge": true,
            })
        );

        let described = request.with_description("Billing service");
        assert_eq!(
            serde_json::to_value(&described).unwrap()["description"],
            "Billing service"
        );
    }

    #[test]
    fn test_record_full_name_uses_platform_values() {
        let record: RepositoryRecord = serde_json::from_value(serde_json::json!({
            "id": 1296269,
            "name": "Billing-Svc",
            "owner": { "login": "Acme" },
            "ssh_url": "git@github.com:Acme/Billing-Svc.git",
            "clone_url": "https://github.com/Acme/Billing-Svc.git",
            "private": true
        }))
        .unwrap();
        assert_eq!(record.full_name(), RepositoryFullname::new("Acme", "Billing-Svc"));
        assert!(record.html_url.is_empty());
    }
}
