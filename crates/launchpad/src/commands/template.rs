use colored::Colorize;
use launchpad_config::LaunchpadConfig;
use launchpad_template::catalog;

pub fn handle_list(config: &LaunchpadConfig) -> anyhow::Result<()> {
    let root = config.templates_repository()?;
    let templates = catalog::list(root)?;

    if templates.is_empty() {
        println!(
            "{}",
            format!("No templates found in {}", root.display()).yellow()
        );
        return Ok(());
    }

    println!("{}", "Templates:".bold());
    for template in &templates {
        if template.description.is_empty() {
            println!("  {}", template.name.cyan());
        } else {
            println!("  {} - {}", template.name.cyan(), template.description);
        }
    }
    Ok(())
}

pub fn handle_describe(config: &LaunchpadConfig, name: &str) -> anyhow::Result<()> {
    let template = catalog::get(config.templates_repository()?, name)?;

    println!("{}", template.name.cyan().bold());
    if !template.description.is_empty() {
        println!("{}", template.description);
    }
    println!();
    println!("{}", "Parameters:".bold());
    for parameter in &template.parameters {
        let mut notes = vec![parameter.param_type.to_string()];
        if let Some(default) = &parameter.default {
            notes.push(format!("default: {}", default));
        }
        if parameter.optional {
            notes.push("optional".to_string());
        }
        println!(
            "  {} ({}) {}",
            parameter.name.cyan(),
            notes.join(", "),
            parameter.description.dimmed()
        );
    }
    Ok(())
}
