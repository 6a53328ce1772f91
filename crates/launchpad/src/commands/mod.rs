pub mod app;
pub mod env;
pub mod template;
pub mod tenant;

use launchpad_config::LaunchpadConfig;
use launchpad_core::PlatformRepository;
use launchpad_git::GitCli;

/// 設定に従ったプラットフォーム設定リポジトリ
pub fn platform_repository(config: &LaunchpadConfig) -> anyhow::Result<PlatformRepository> {
    Ok(PlatformRepository::new(config.platform_repository()?)
        .with_environments_dir(config.environments_dir())
        .with_tenants_dir(config.tenants_dir()))
}

/// 設定された実行ファイルとオプションを使う git CLI
pub fn git_cli(config: &LaunchpadConfig) -> GitCli {
    let mut git = GitCli::new();
    if let Some(program) = &config.git.program {
        git = git.with_program(program);
    }
    for (key, value) in &config.git.config {
        git = git.with_config(key, value);
    }
    git
}
