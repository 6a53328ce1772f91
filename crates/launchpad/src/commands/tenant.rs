use colored::Colorize;
use launchpad_config::LaunchpadConfig;

pub fn handle_list(config: &LaunchpadConfig) -> anyhow::Result<()> {
    let platform = super::platform_repository(config)?;
    let tenants = platform.list_tenants()?;

    if tenants.is_empty() {
        println!(
            "{}",
            format!("No tenants found in {}", platform.root().display()).yellow()
        );
        return Ok(());
    }

    println!("{}", "Tenants:".bold());
    for tenant in &tenants {
        if tenant.description.is_empty() {
            println!("  {}", tenant.name.cyan());
        } else {
            println!("  {} - {}", tenant.name.cyan(), tenant.description);
        }
    }
    Ok(())
}
