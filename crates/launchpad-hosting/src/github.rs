//! GitHub REST API client
//!
//! Direct API implementation of [`HostingPlatform`] using a bearer token.

use crate::error::{HostingError, Result};
use crate::provider::{
    CreateRepositoryRequest, HostingPlatform, RepositoryRecord, RepositoryVariable,
};
use async_trait::async_trait;
use launchpad_core::RepositoryFullname;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;

pub const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("launchpad/", env!("CARGO_PKG_VERSION"));

/// Configuration for the GitHub client
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    /// API base URL; differs from the default on GitHub Enterprise Server
    pub api_url: String,
}

impl GitHubConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: GITHUB_API_BASE.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        if config.token.trim().is_empty() {
            return Err(HostingError::InvalidConfig(
                "GitHub token is empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            token: config.token,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!("GitHub API: {} {}", method, url);
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// Turn a non-2xx response into an `ApiError` carrying GitHub's message
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorBody>(&body) {
            Ok(api_error) => api_error.describe(),
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
            Err(_) => body,
        };
        Err(HostingError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl HostingPlatform for GitHubClient {
    fn name(&self) -> &str {
        "github"
    }

    async fn create_repository(
        &self,
        org: &str,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryRecord> {
        let response = self
            .request(Method::POST, &format!("/orgs/{}/repos", org))
            .json(request)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let record: RepositoryRecord = response.json().await?;
        tracing::info!(
            repository = %record.full_name(),
            id = record.id,
            "Created GitHub repository"
        );
        Ok(record)
    }

    async fn create_repository_variable(
        &self,
        repository: &RepositoryFullname,
        variable: &RepositoryVariable,
    ) -> Result<()> {
        let path = format!(
            "/repos/{}/{}/actions/variables",
            repository.organization, repository.name
        );
        let response = self
            .request(Method::POST, &path)
            .json(variable)
            .send()
            .await?;
        Self::check_response(response).await?;

        tracing::debug!(
            repository = %repository,
            variable = %variable.name,
            "Created repository variable"
        );
        Ok(())
    }
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl ApiErrorBody {
    fn describe(&self) -> String {
        let details: Vec<String> = self
            .errors
            .iter()
            .filter_map(|e| {
                e.message.clone().or_else(|| match (&e.field, &e.code) {
                    (Some(field), Some(code)) => Some(format!("{}: {}", field, code)),
                    _ => None,
                })
            })
            .collect();
        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}
