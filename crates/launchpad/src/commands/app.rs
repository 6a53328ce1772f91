use anyhow::{Context, anyhow};
use clap::Args;
use colored::Colorize;
use launchpad_config::LaunchpadConfig;
use launchpad_core::{PlatformRepository, RepositoryFullname, StageVarName};
use launchpad_hosting::{GitHubClient, GitHubConfig};
use launchpad_onboard::{
    ApplicationService, CreateOp, CreateResult, OnboardStep, StageEnvironments,
};
use launchpad_template::{FulfilledTemplate, TeraRenderer, catalog};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// アプリケーション名（指定がなければリポジトリ名にも使用）
    pub name: String,

    /// ローカルのワークスペース（デフォルト: ./<name>）
    pub local_path: Option<PathBuf>,

    /// アプリケーションを所有するテナント
    #[arg(long)]
    pub tenant: String,

    /// 新しいリポジトリに展開するテンプレート
    #[arg(short = 't', long = "from-template")]
    pub from_template: Option<String>,

    /// テンプレート引数 key=value（複数指定可）
    #[arg(long = "arg", value_parser = parse_key_val)]
    pub args: Vec<(String, String)>,

    /// アプリケーション名と異なるリポジトリ名
    #[arg(long)]
    pub github_repo_name: Option<String>,

    /// リポジトリの説明
    #[arg(long)]
    pub description: Option<String>,

    /// fast-feedback ステージの環境（複数指定可、デフォルトは設定ファイル）
    #[arg(long = "fast-feedback-env")]
    pub fast_feedback_envs: Vec<String>,

    /// extended-test ステージの環境（複数指定可、デフォルトは設定ファイル）
    #[arg(long = "extended-test-env")]
    pub extended_test_envs: Vec<String>,

    /// 本番ステージの環境（複数指定可、デフォルトは設定ファイル）
    #[arg(long = "prod-env")]
    pub prod_envs: Vec<String>,

    /// GitHub トークン
    #[arg(long)]
    pub github_token: Option<String>,

    /// リポジトリを所有する GitHub organization
    #[arg(long)]
    pub github_org: Option<String>,

    /// プラットフォーム設定リポジトリのチェックアウト
    #[arg(long)]
    pub platform_repo: Option<PathBuf>,

    /// テンプレートカタログのチェックアウト
    #[arg(long)]
    pub templates_repo: Option<PathBuf>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

impl CreateArgs {
    /// 引数は設定ファイルと環境変数より優先
    fn apply_overrides(&self, mut config: LaunchpadConfig) -> LaunchpadConfig {
        if let Some(token) = &self.github_token {
            config.github.token = Some(token.clone());
        }
        if let Some(org) = &self.github_org {
            config.github.organization = Some(org.clone());
        }
        if let Some(platform) = &self.platform_repo {
            config.repositories.platform = Some(platform.clone());
        }
        if let Some(templates) = &self.templates_repo {
            config.repositories.templates = Some(templates.clone());
        }
        config
    }

    fn stage_envs<'a>(&'a self, config: &'a LaunchpadConfig, stage: StageVarName) -> &'a [String] {
        let flags = match stage {
            StageVarName::FastFeedback => &self.fast_feedback_envs,
            StageVarName::ExtendedTest => &self.extended_test_envs,
            StageVarName::Prod => &self.prod_envs,
        };
        if flags.is_empty() {
            config.default_envs(stage)
        } else {
            flags
        }
    }
}

pub async fn handle_create(args: CreateArgs, config: LaunchpadConfig) -> anyhow::Result<()> {
    let config = args.apply_overrides(config);
    let organization = config.github_organization()?.to_string();
    let token = config.github_token()?.to_string();

    let platform = super::platform_repository(&config)?;
    let tenant = platform.find_tenant(&args.tenant)?.ok_or_else(|| {
        anyhow!(
            "tenant '{}' not found in {}",
            args.tenant,
            platform.root().display()
        )
    })?;
    let stages = resolve_stages(&args, &config, &platform)?;

    let templates_root = config.repositories.templates.clone().unwrap_or_default();
    let template = match &args.from_template {
        Some(name) => Some(fulfill_template(&args, &config, name, &tenant.name)?),
        None => None,
    };

    let local_path = args
        .local_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(".").join(&args.name));

    let op = CreateOp {
        name: args.name.clone(),
        github_repo_name: args.github_repo_name.clone(),
        description: args.description.clone(),
        organization,
        local_path,
        tenant,
        stages,
        template,
        templates_root,
    };

    let git = super::git_cli(&config);
    let git_version = git
        .check_installed()
        .await
        .context("checking the git installation")?;
    tracing::debug!(version = %git_version, "Using git");

    let with_template = op.template.is_some();
    let mut github_config = GitHubConfig::new(token);
    if let Some(api_url) = &config.github.api_url {
        github_config = github_config.with_api_url(api_url);
    }
    let service = ApplicationService::new(
        Arc::new(GitHubClient::new(github_config)?),
        Arc::new(git),
        Arc::new(TeraRenderer::new()),
    );

    println!(
        "{}",
        format!("Creating application {}...", args.name).blue()
    );
    match service.create(op).await {
        Ok(result) => {
            print_created(&result);
            Ok(())
        }
        Err(e) => {
            eprintln!();
            eprintln!("{} {}", "✗ Failed at step:".red().bold(), e.step());
            let completed = completed_steps(e.step(), with_template);
            if !completed.is_empty() {
                let names: Vec<_> = completed.iter().map(OnboardStep::name).collect();
                eprintln!("  Completed: {}", names.join(", "));
            }
            if e.remote_exists() {
                eprintln!(
                    "{}",
                    "  The remote repository was created and has not been removed.".yellow()
                );
            }
            Err(e.into())
        }
    }
}

fn resolve_stages(
    args: &CreateArgs,
    config: &LaunchpadConfig,
    platform: &PlatformRepository,
) -> anyhow::Result<StageEnvironments> {
    let resolve = |stage: StageVarName| {
        platform
            .resolve_environments(args.stage_envs(config, stage))
            .with_context(|| format!("resolving {} environments", stage))
    };
    Ok(StageEnvironments {
        fast_feedback: resolve(StageVarName::FastFeedback)?,
        extended_test: resolve(StageVarName::ExtendedTest)?,
        prod: resolve(StageVarName::Prod)?,
    })
}

fn fulfill_template(
    args: &CreateArgs,
    config: &LaunchpadConfig,
    name: &str,
    tenant: &str,
) -> anyhow::Result<FulfilledTemplate> {
    let spec = catalog::get(config.templates_repository()?, name)?;
    let mut values: HashMap<String, String> = args.args.iter().cloned().collect();
    values
        .entry("name".to_string())
        .or_insert_with(|| args.name.clone());
    values
        .entry("tenant".to_string())
        .or_insert_with(|| tenant.to_string());
    Ok(FulfilledTemplate::fulfill(spec, &values)?)
}

/// `failed` より前に完了したステップ
fn completed_steps(failed: OnboardStep, with_template: bool) -> Vec<OnboardStep> {
    OnboardStep::plan(with_template)
        .into_iter()
        .take_while(|step| *step != failed)
        .collect()
}

fn print_created(result: &CreateResult) {
    println!();
    println!("{}", "✓ Application created!".green().bold());
    println!(
        "  Repository: {}",
        result.repository.http_url().cyan()
    );
    println!("  Local path: {}", result.local_path.display());
    println!("{}", next_steps(&result.repository));
}

fn next_steps(repository: &RepositoryFullname) -> String {
    format!(
        "\nYour application will be deployed with its next commit, or you can\n\
        trigger the delivery workflow manually from the GitHub web interface or CLI.\n\
        Workflows: {}\n\
        GitHub CLI:\n  \
        gh workflow list -R {}\n  \
        gh workflow run <workflow-id> -R {}",
        repository.actions_http_url(),
        repository,
        repository
    )
}
