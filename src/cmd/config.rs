//! Configuration inspection - `nexus config`.

use anyhow::{Context, Result};
use std::path::Path;

use nexus::config::Config;
use nexus::init::get_nexus_dir;
use nexus::nexus_config::{CONFIG_FILE, NexusToml};
use nexus::ui::icons::CHECK;

use crate::ConfigCommands;

pub fn cmd_config(project_dir: &Path, command: Option<ConfigCommands>) -> Result<()> {
    match command.unwrap_or(ConfigCommands::Show) {
        ConfigCommands::Show => cmd_config_show(project_dir),
        ConfigCommands::Validate => cmd_config_validate(project_dir),
        ConfigCommands::Init => cmd_config_init(project_dir),
    }
}

fn cmd_config_show(project_dir: &Path) -> Result<()> {
    let config = Config::new(project_dir.to_path_buf(), false, None, None)?;
    let toml = config.toml();

    println!("Project: {}", config.project_name());
    if let Some(description) = config.project_description() {
        println!("  description: {description}");
    }
    println!("Extraction:");
    println!("  confidence_threshold: {}", config.confidence_threshold());
    println!("LLM:");
    println!("  provider:   {}", config.provider());
    println!(
        "  model:      {}",
        toml.llm.model.as_deref().unwrap_or("(backend default)")
    );
    println!("  max_tokens: {}", toml.llm.max_tokens);
    println!("  claude_cmd: {}", config.claude_cmd());

    Ok(())
}

fn cmd_config_validate(project_dir: &Path) -> Result<()> {
    let nexus_dir = get_nexus_dir(project_dir);
    let toml = NexusToml::load_or_default(&nexus_dir)?;
    let warnings = toml.validate();

    if warnings.is_empty() {
        println!("{}Configuration is valid.", CHECK);
    } else {
        for warning in &warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}

fn cmd_config_init(project_dir: &Path) -> Result<()> {
    let nexus_dir = get_nexus_dir(project_dir);
    let config_file = nexus_dir.join(CONFIG_FILE);
    if config_file.exists() {
        println!("Config already exists at {}", config_file.display());
        return Ok(());
    }

    std::fs::create_dir_all(&nexus_dir)
        .with_context(|| format!("Failed to create directory: {}", nexus_dir.display()))?;
    std::fs::write(&config_file, NexusToml::default_toml())
        .with_context(|| format!("Failed to write config template: {}", config_file.display()))?;
    println!("Wrote default config to {}", config_file.display());
    Ok(())
}
