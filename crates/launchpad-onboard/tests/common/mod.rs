#![allow(dead_code)]

use async_trait::async_trait;
use launchpad_core::{Domain, Environment, PlatformProject, RepositoryFullname, Tenant};
use launchpad_git::{GitError, VersionControl};
use launchpad_hosting::{
    CreateRepositoryRequest, HostingError, HostingPlatform, RepositoryOwner, RepositoryRecord,
    RepositoryVariable,
};
use launchpad_onboard::{ApplicationService, CreateOp, StageEnvironments};
use launchpad_template::{FulfilledTemplate, TemplateError, TemplateMaterializer, TemplateSpec};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// パイプラインが行った呼び出し（呼び出し順）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Init(PathBuf),
    Render { template: String, name: String, tenant: String },
    AddAll,
    Commit(String),
    CreateRepository { org: String, request: CreateRepositoryRequest },
    SetRemote(String),
    Push,
    CreateVariable { repository: String, name: String, value: String },
}

/// 失敗を注入する箇所
#[derive(Debug, Default, Clone)]
pub struct Failures {
    pub init: bool,
    pub render: bool,
    pub commit: bool,
    /// リポジトリ作成が返すHTTPステータスとメッセージ
    pub create_repository: Option<(u16, String)>,
    pub set_remote: bool,
    pub push: bool,
    /// 公開に失敗させる変数
    pub variable: Option<String>,
}

/// パイプラインの全依存先を兼ねるインメモリのテストダブル
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    failures: Failures,
    /// ホスティング側が名前を正規化する場合に返す名前
    normalized_name: Option<String>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Self::failing(Failures::default())
    }

    pub fn failing(failures: Failures) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failures,
            normalized_name: None,
        })
    }

    pub fn normalizing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            failures: Failures::default(),
            normalized_name: Some(name.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// 公開された変数 (name, value)（公開順）
    pub fn variables(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateVariable { name, value, .. } => Some((name, value)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|&c| predicate(c)).count()
    }

    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(predicate)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn service(self: &Arc<Self>) -> ApplicationService {
        ApplicationService::new(self.clone(), self.clone(), self.clone())
    }
}

fn git_failure(command: &str) -> GitError {
    GitError::CommandFailed {
        command: command.to_string(),
        stderr: "injected failure".to_string(),
    }
}

#[async_trait]
impl VersionControl for Recorder {
    async fn init(&self, path: &Path) -> launchpad_git::Result<()> {
        self.record(Call::Init(path.to_path_buf()));
        if self.failures.init {
            return Err(git_failure("init"));
        }
        Ok(())
    }

    async fn add_all(&self, _path: &Path) -> launchpad_git::Result<()> {
        self.record(Call::AddAll);
        Ok(())
    }

    async fn commit(&self, _path: &Path, message: &str) -> launchpad_git::Result<()> {
        self.record(Call::Commit(message.to_string()));
        if self.failures.commit {
            return Err(git_failure("commit"));
        }
        Ok(())
    }

    async fn set_remote(&self, _path: &Path, url: &str) -> launchpad_git::Result<()> {
        self.record(Call::SetRemote(url.to_string()));
        if self.failures.set_remote {
            return Err(git_failure("remote"));
        }
        Ok(())
    }

    async fn push(&self, _path: &Path) -> launchpad_git::Result<()> {
        self.record(Call::Push);
        if self.failures.push {
            return Err(git_failure("push"));
        }
        Ok(())
    }
}

#[async_trait]
impl HostingPlatform for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn create_repository(
        &self,
        org: &str,
        request: &CreateRepositoryRequest,
    ) -> launchpad_hosting::Result<RepositoryRecord> {
        self.record(Call::CreateRepository {
            org: org.to_string(),
            request: request.clone(),
        });
        if let Some((status, message)) = &self.failures.create_repository {
            return Err(HostingError::ApiError {
                status: *status,
                message: message.clone(),
            });
        }

        let name = self
            .normalized_name
            .clone()
            .unwrap_or_else(|| request.name.clone());
        Ok(RepositoryRecord {
            id: 1,
            ssh_url: format!("git@github.com:{}/{}.git", org, name),
            clone_url: format!("https://github.com/{}/{}.git", org, name),
            html_url: format!("https://github.com/{}/{}", org, name),
            name,
            owner: RepositoryOwner {
                login: org.to_string(),
            },
        })
    }

    async fn create_repository_variable(
        &self,
        repository: &RepositoryFullname,
        variable: &RepositoryVariable,
    ) -> launchpad_hosting::Result<()> {
        self.record(Call::CreateVariable {
            repository: repository.to_string(),
            name: variable.name.clone(),
            value: variable.value.clone(),
        });
        if self.failures.variable.as_deref() == Some(variable.name.as_str()) {
            return Err(HostingError::ApiError {
                status: 500,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl TemplateMaterializer for Recorder {
    fn render(
        &self,
        template: &FulfilledTemplate,
        _templates_root: &Path,
        _destination: &Path,
    ) -> launchpad_template::Result<()> {
        let text = |key: &str| {
            template
                .argument(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        self.record(Call::Render {
            template: template.spec.name.clone(),
            name: text("name"),
            tenant: text("tenant"),
        });
        if self.failures.render {
            return Err(TemplateError::NotFound(template.spec.name.clone()));
        }
        Ok(())
    }
}

/// 検証を通る環境
pub fn environment(name: &str) -> Environment {
    Environment {
        environment: name.to_string(),
        platform: PlatformProject {
            project_id: format!("{}-project", name),
            project_number: "123456".to_string(),
        },
        ingress_domains: vec![Domain::new("default", format!("{}.example.com", name))],
        internal_services: Domain::new("internal", format!("{}.internal.example.com", name)),
    }
}

pub fn template(name: &str) -> FulfilledTemplate {
    let spec: TemplateSpec = serde_yaml::from_str(&format!("name: {}", name)).unwrap();
    FulfilledTemplate {
        spec: spec.with_implicit_parameters(),
        arguments: Vec::new(),
    }
}

/// billing-svc の要求: fast-feedback [dev], extended-test [], prod [prod]
pub fn billing_request(workspace: &Path) -> CreateOp {
    CreateOp {
        name: "billing-svc".to_string(),
        github_repo_name: None,
        description: None,
        organization: "acme".to_string(),
        local_path: workspace.join("billing-svc"),
        tenant: Tenant::new("payments"),
        stages: StageEnvironments {
            fast_feedback: vec![environment("dev")],
            extended_test: Vec::new(),
            prod: vec![environment("prod")],
        },
        template: None,
        templates_root: workspace.join("templates"),
    }
}
