//! プラットフォームリポジトリの読み込み
//!
//! プラットフォーム設定リポジトリのローカルチェックアウトから
//! 環境とテナントの定義を読み込みます:
//!
//! ```text
//! <root>/
//! ├── environments/
//! │   ├── dev/config.yaml
//! │   └── prod/config.yaml
//! └── tenants/tenants/
//!     ├── payments.yaml
//!     └── finance/ledger.yaml
//! ```

use crate::error::{CoreError, Result};
use crate::model::{Environment, Tenant};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_ENVIRONMENTS_DIR: &str = "environments";
pub const DEFAULT_TENANTS_DIR: &str = "tenants/tenants";
const ENVIRONMENT_FILE: &str = "config.yaml";

/// プラットフォーム設定リポジトリのローカルチェックアウト
#[derive(Debug, Clone)]
pub struct PlatformRepository {
    root: PathBuf,
    environments_dir: PathBuf,
    tenants_dir: PathBuf,
}

impl PlatformRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            environments_dir: PathBuf::from(DEFAULT_ENVIRONMENTS_DIR),
            tenants_dir: PathBuf::from(DEFAULT_TENANTS_DIR),
        }
    }

    /// 環境ディレクトリを上書き（リポジトリルートからの相対パス）
    pub fn with_environments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.environments_dir = dir.into();
        self
    }

    /// テナントディレクトリを上書き（リポジトリルートからの相対パス）
    pub fn with_tenants_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tenants_dir = dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 全環境をディレクトリ名順に取得
    ///
    /// `config.yaml` のないディレクトリはスキップします。
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn list_environments(&self) -> Result<Vec<Environment>> {
        let dir = self.root.join(&self.environments_dir);
        let mut env_dirs = Vec::new();
        for entry in read_dir(&dir)? {
            let path = entry
                .map_err(|e| discovery_error(&dir, "failed to read directory entry", e))?
                .path();
            if path.is_dir() {
                env_dirs.push(path);
            }
        }
        env_dirs.sort();

        let mut environments = Vec::with_capacity(env_dirs.len());
        for env_dir in env_dirs {
            let config = env_dir.join(ENVIRONMENT_FILE);
            if !config.is_file() {
                debug!(dir = %env_dir.display(), "No environment config, skipping");
                continue;
            }
            environments.push(read_yaml::<Environment>(&config)?);
        }
        debug!(count = environments.len(), "Loaded environments");
        Ok(environments)
    }

    /// 環境名を解決（指定された順序を保持）
    pub fn resolve_environments(&self, names: &[String]) -> Result<Vec<Environment>> {
        let known = self.list_environments()?;
        names
            .iter()
            .map(|name| {
                known
                    .iter()
                    .find(|env| env.name() == name)
                    .cloned()
                    .ok_or_else(|| CoreError::EnvironmentNotFound(name.clone()))
            })
            .collect()
    }

    /// 全テナントをファイルパス順に取得
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub fn list_tenants(&self) -> Result<Vec<Tenant>> {
        let mut files = Vec::new();
        let mut visited = HashSet::new();
        visit_dir(&self.root.join(&self.tenants_dir), &mut files, &mut visited)?;
        files.sort();

        files.iter().map(|path| read_yaml::<Tenant>(path)).collect()
    }

    pub fn find_tenant(&self, name: &str) -> Result<Option<Tenant>> {
        Ok(self.list_tenants()?.into_iter().find(|t| t.name == name))
    }
}

fn read_dir(dir: &Path) -> Result<std::fs::ReadDir> {
    std::fs::read_dir(dir).map_err(|e| discovery_error(dir, "failed to read directory", e))
}

fn discovery_error(path: &Path, what: &str, e: std::io::Error) -> CoreError {
    CoreError::DiscoveryError {
        path: path.to_path_buf(),
        message: format!("{}: {}", what, e),
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| discovery_error(path, "failed to read file", e))?;
    serde_yaml::from_str(&content).map_err(|source| CoreError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// `dir` 配下の `.yaml` ファイルを収集（シンボリックリンクのループを検出）
fn visit_dir(dir: &Path, files: &mut Vec<PathBuf>, visited: &mut HashSet<PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let canonical_dir = dir
        .canonicalize()
        .map_err(|e| discovery_error(dir, "failed to canonicalize path", e))?;
    if !visited.insert(canonical_dir.clone()) {
        warn!(dir = %canonical_dir.display(), "Symlink loop detected, skipping");
        return Ok(());
    }

    for entry in read_dir(dir)? {
        let path = entry
            .map_err(|e| discovery_error(dir, "failed to read directory entry", e))?
            .path();
        if path.is_dir() {
            visit_dir(&path, files, visited)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some("yaml") {
            files.push(path);
        }
    }
    Ok(())
}
