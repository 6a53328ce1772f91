//! Launchpad hosting platform
//!
//! Repository hosting abstraction used by the onboarding pipeline. Only two
//! capabilities are required: creating a repository and creating a
//! repository-scoped configuration variable.
//!
//! # Example
//!
//! ```ignore
//! use launchpad_hosting::{CreateRepositoryRequest, GitHubClient, GitHubConfig, HostingPlatform};
//!
//! let github = GitHubClient::new(GitHubConfig::new(token))?;
//! let record = github
//!     .create_repository("acme", &CreateRepositoryRequest::private("billing-svc"))
//!     .await?;
//! println!("{}", record.full_name());
//! ```

pub mod error;
pub mod github;
pub mod provider;

pub use error::{HostingError, Result};
pub use github::{GITHUB_API_BASE, GitHubClient, GitHubConfig};
pub use provider::{
    CreateRepositoryRequest, HostingPlatform, RepositoryOwner, RepositoryRecord,
    RepositoryVariable, Visibility,
};
