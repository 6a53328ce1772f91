//! Launchpad 設定管理
//!
//! 起動時にYAMLファイルを一度だけ読み込み、環境変数で上書きします。
//! コマンドライン引数はバイナリ側でさらに上書きします。

pub mod error;

pub use error::*;

use launchpad_core::{DEFAULT_ENVIRONMENTS_DIR, DEFAULT_TENANTS_DIR, StageVarName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 設定ファイルのパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "LAUNCHPAD_CONFIG";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const GITHUB_ORG_ENV: &str = "LAUNCHPAD_GITHUB_ORG";

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LaunchpadConfig {
    #[serde(default)]
    pub github: GitHubSettings,
    #[serde(default)]
    pub repositories: RepositorySettings,
    #[serde(default)]
    pub p2p: PathToProductionSettings,
    #[serde(default)]
    pub git: GitSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitHubSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RepositorySettings {
    /// プラットフォーム設定リポジトリのチェックアウト
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PathBuf>,
    /// テンプレートカタログのチェックアウト
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenants_dir: Option<PathBuf>,
}

/// ローカルワークスペースで使う git の設定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GitSettings {
    /// git 実行ファイル（デフォルト: PATH 上の `git`）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    /// `-c key=value` で渡す設定（例: `user.email`, `commit.gpgsign`）
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, String>,
}

/// デプロイステージごとのデフォルト環境
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathToProductionSettings {
    #[serde(default)]
    pub fast_feedback: StageSettings,
    #[serde(default)]
    pub extended_test: StageSettings,
    #[serde(default)]
    pub prod: StageSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StageSettings {
    #[serde(default)]
    pub default_envs: Vec<String>,
}

impl PathToProductionSettings {
    pub fn stage(&self, stage: StageVarName) -> &StageSettings {
        match stage {
            StageVarName::FastFeedback => &self.fast_feedback,
            StageVarName::ExtendedTest => &self.extended_test,
            StageVarName::Prod => &self.prod,
        }
    }
}

impl LaunchpadConfig {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `GITHUB_TOKEN` と `LAUNCHPAD_GITHUB_ORG` が空でなければ上書き
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(token) = non_empty_env(GITHUB_TOKEN_ENV) {
            debug!("GitHub token taken from {}", GITHUB_TOKEN_ENV);
            self.github.token = Some(token);
        }
        if let Some(org) = non_empty_env(GITHUB_ORG_ENV) {
            self.github.organization = Some(org);
        }
        self
    }

    pub fn github_token(&self) -> Result<&str> {
        required(
            self.github.token.as_deref(),
            "github.token",
            "set it in the config file, export GITHUB_TOKEN or pass --github-token",
        )
    }

    pub fn github_organization(&self) -> Result<&str> {
        required(
            self.github.organization.as_deref(),
            "github.organization",
            "set it in the config file, export LAUNCHPAD_GITHUB_ORG or pass --github-org",
        )
    }

    pub fn platform_repository(&self) -> Result<&Path> {
        self.repositories
            .platform
            .as_deref()
            .ok_or(ConfigError::MissingValue {
                key: "repositories.platform",
                hint: "path to a checkout of the platform configuration repository",
            })
    }

    pub fn templates_repository(&self) -> Result<&Path> {
        self.repositories
            .templates
            .as_deref()
            .ok_or(ConfigError::MissingValue {
                key: "repositories.templates",
                hint: "path to a checkout of the template catalog",
            })
    }

    pub fn environments_dir(&self) -> &Path {
        self.repositories
            .environments_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_ENVIRONMENTS_DIR))
    }

    pub fn tenants_dir(&self) -> &Path {
        self.repositories
            .tenants_dir
            .as_deref()
            .unwrap_or(Path::new(DEFAULT_TENANTS_DIR))
    }

    pub fn default_envs(&self, stage: StageVarName) -> &[String] {
        &self.p2p.stage(stage).default_envs
    }
}

fn required<'a>(value: Option<&'a str>, key: &'static str, hint: &'static str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingValue { key, hint })
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// デフォルトの設定ファイルパス
pub fn default_config_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("launchpad")
        .join(CONFIG_FILE))
}

/// 設定ファイルのパスを解決
///
/// 以下の優先順位:
/// 1. 環境変数 `LAUNCHPAD_CONFIG` (直接パス指定)
/// 2. `<設定ディレクトリ>/launchpad/config.yaml`
pub fn config_path() -> Result<PathBuf> {
    match non_empty_env(CONFIG_PATH_ENV) {
        Some(path) => Ok(PathBuf::from(path)),
        None => default_config_path(),
    }
}

/// 設定ファイルを読み込む（環境変数による上書きなし）
pub fn load_from(path: &Path) -> Result<LaunchpadConfig> {
    if !path.is_file() {
        return Err(ConfigError::ConfigFileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), "Loading configuration");
    LaunchpadConfig::from_yaml(&content, path)
}

/// 環境変数の上書きを適用して設定を読み込む
///
/// デフォルトパスにファイルがなければデフォルト設定を返す。
/// `LAUNCHPAD_CONFIG` で指定したファイルがない場合はエラー。
pub fn load() -> Result<LaunchpadConfig> {
    let path = config_path()?;
    let config = match load_from(&path) {
        Ok(config) => config,
        Err(ConfigError::ConfigFileNotFound(_)) if non_empty_env(CONFIG_PATH_ENV).is_none() => {
            debug!(path = %path.display(), "No configuration file, using defaults");
            LaunchpadConfig::default()
        }
        Err(e) => return Err(e),
    };
    Ok(config.apply_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const SAMPLE: &str = r#"
github:
  token: file-token
  organization: acme
  api-url: https://ghe.example.com/api/v3
repositories:
  platform: /srv/platform
  templates: /srv/templates
  tenants-dir: teams
p2p:
  fast-feedback:
    default-envs: [dev]
  prod:
    default-envs: [prod-eu, prod-us]
git:
  program: /usr/local/bin/git
  config:
    user.name: Launchpad Bot
    commit.gpgsign: "false"
"#;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("config.yaml");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn test_parse_full_config() {
        let config = LaunchpadConfig::from_yaml(SAMPLE, Path::new("config.yaml")).unwrap();
        assert_eq!(config.github_token().unwrap(), "file-token");
        assert_eq!(config.github_organization().unwrap(), "acme");
        assert_eq!(
            config.github.api_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert_eq!(config.platform_repository().unwrap(), Path::new("/srv/platform"));
        assert_eq!(config.environments_dir(), Path::new("environments"));
        assert_eq!(config.tenants_dir(), Path::new("teams"));
        assert_eq!(config.git.program.as_deref(), Some("/usr/local/bin/git"));
        assert_eq!(
            config.git.config.get("commit.gpgsign").map(String::as_str),
            Some("false")
        );
        assert_eq!(config.default_envs(StageVarName::FastFeedback), ["dev"]);
        assert!(config.default_envs(StageVarName::ExtendedTest).is_empty());
        assert_eq!(config.default_envs(StageVarName::Prod), ["prod-eu", "prod-us"]);
    }

    #[test]
    fn test_missing_values_reported() {
        let config = LaunchpadConfig::default();
        match config.github_token() {
            Err(ConfigError::MissingValue { key, .. }) => assert_eq!(key, "github.token"),
            other => panic!("expected missing value, got {:?}", other),
        }
        assert!(config.platform_repository().is_err());
        assert!(config.templates_repository().is_err());
        assert_eq!(config.tenants_dir(), Path::new("tenants/tenants"));
        assert!(config.git.program.is_none());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = LaunchpadConfig::from_yaml("github: [", Path::new("/tmp/bad.yaml")).unwrap_err();
        assert!(err.to_string().contains("/tmp/bad.yaml"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path());

        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some(path.to_str().unwrap())),
                (GITHUB_TOKEN_ENV, Some("env-token")),
                (GITHUB_ORG_ENV, Some("other-org")),
            ],
            || {
                let config = load().unwrap();
                assert_eq!(config.github_token().unwrap(), "env-token");
                assert_eq!(config.github_organization().unwrap(), "other-org");
                assert_eq!(config.templates_repository().unwrap(), Path::new("/srv/templates"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_empty_env_values_ignored() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write_sample(temp_dir.path());

        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, Some(path.to_str().unwrap())),
                (GITHUB_TOKEN_ENV, Some("")),
                (GITHUB_ORG_ENV, None),
            ],
            || {
                let config = load().unwrap();
                assert_eq!(config.github_token().unwrap(), "file-token");
                assert_eq!(config.github_organization().unwrap(), "acme");
            },
        );
    }

    #[test]
    #[serial]
    fn test_explicit_path_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.yaml");

        temp_env::with_var(CONFIG_PATH_ENV, Some(missing.to_str().unwrap()), || {
            assert_eq!(config_path().unwrap(), missing);
            assert!(matches!(load(), Err(ConfigError::ConfigFileNotFound(_))));
        });
    }

    #[test]
    #[serial]
    fn test_default_path() {
        temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            let path = config_path().unwrap();
            assert!(path.ends_with("launchpad/config.yaml"));
        });
    }
}
