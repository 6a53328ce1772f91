//! アプリケーション作成要求の事前検証
//!
//! 副作用の前に実行するため、拒否された要求は何も残しません。

use crate::create::CreateOp;
use crate::error::{OnboardError, Result};
use launchpad_core::validate_repository_name;
use std::path::Path;

pub fn validate_request(op: &CreateOp) -> Result<()> {
    validate_repository_name(op.repository_name()).map_err(invalid)?;
    op.tenant.validate().map_err(invalid)?;

    if op.organization.trim().is_empty() {
        return Err(OnboardError::Validation(
            "organization must not be empty".to_string(),
        ));
    }

    for environment in op.stages.iter() {
        environment.validate().map_err(invalid)?;
    }

    validate_local_path(&op.local_path)
}

/// ワークスペースは存在しないか、空のディレクトリであること
pub fn validate_local_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !path.is_dir() {
        return Err(OnboardError::Validation(format!(
            "{} exists and is not a directory",
            path.display()
        )));
    }

    let mut entries = std::fs::read_dir(path).map_err(|e| {
        OnboardError::Validation(format!("cannot read {}: {}", path.display(), e))
    })?;
    if entries.next().is_some() {
        return Err(OnboardError::Validation(format!(
            "{} is not empty",
            path.display()
        )));
    }
    Ok(())
}

fn invalid(e: impl std::fmt::Display) -> OnboardError {
    OnboardError::Validation(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publish::StageEnvironments;
    use launchpad_core::Tenant;
    use std::fs;
    use std::path::PathBuf;

    fn request(name: &str, tenant: &str, local_path: PathBuf) -> CreateOp {
        CreateOp {
            name: name.to_string(),
            github_repo_name: None,
            description: None,
            organization: "acme".to_string(),
            local_path,
            tenant: Tenant::new(tenant),
            stages: StageEnvironments::default(),
            template: None,
            templates_root: PathBuf::new(),
        }
    }

    #[test]
    fn test_validate_request() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("billing-svc");
        assert!(validate_request(&request("billing-svc", "payments", path.clone())).is_ok());

        let err = validate_request(&request("billing-svc", "Payments_Team", path.clone()))
            .unwrap_err()
            .to_string();
        assert!(err.contains("tenant name"), "{}", err);

        let err = validate_request(&request("billing svc", "payments", path))
            .unwrap_err()
            .to_string();
        assert!(err.contains("repository name"), "{}", err);
    }

    #[test]
    fn test_local_path() {
        let temp = tempfile::tempdir().unwrap();
        assert!(validate_local_path(&temp.path().join("missing/app")).is_ok());
        assert!(validate_local_path(temp.path()).is_ok());

        fs::write(temp.path().join("README.md"), "x").unwrap();
        assert!(validate_local_path(temp.path()).is_err());
        assert!(validate_local_path(&temp.path().join("README.md")).is_err());
    }
}
