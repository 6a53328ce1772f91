use colored::Colorize;
use launchpad_config::LaunchpadConfig;

pub fn handle_list(config: &LaunchpadConfig) -> anyhow::Result<()> {
    let platform = super::platform_repository(config)?;
    let environments = platform.list_environments()?;

    if environments.is_empty() {
        println!(
            "{}",
            format!("No environments found in {}", platform.root().display()).yellow()
        );
        return Ok(());
    }

    println!("{}", "Environments:".bold());
    for env in &environments {
        let domain = env
            .default_ingress_domain()
            .map(|d| d.domain.as_str())
            .unwrap_or("(none)");
        println!(
            "  {} project: {} ingress: {}",
            env.name().cyan(),
            env.platform.project_id,
            domain
        );
    }
    Ok(())
}
