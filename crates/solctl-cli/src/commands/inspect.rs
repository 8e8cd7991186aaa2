//! Read-only commands: list, detect, merge-env, config

use anyhow::{bail, Result};
use solctl_config::GlobalConfig;
use solctl_core::{merge, select_strategy, EnvironmentMap, RepoStructure};
use std::path::Path;

/// List registered solutions
pub fn list(config: &GlobalConfig) {
    if config.solutions.is_empty() {
        println!("No solutions registered.");
        println!("\nAdd a [solutions.<type>] table to the config file (see 'solctl config').");
        return;
    }

    // Column widths
    const NAME_WIDTH: usize = 20;
    const TYPE_WIDTH: usize = 8;
    const PORT_WIDTH: usize = 6;

    println!(
        "  {:<NAME_WIDTH$} {:<TYPE_WIDTH$} {:<PORT_WIDTH$} REPOSITORY",
        "SOLUTION", "INSTALL", "PORT"
    );
    for (name, solution) in &config.solutions {
        println!(
            "  {:<NAME_WIDTH$} {:<TYPE_WIDTH$} {:<PORT_WIDTH$} {} ({})",
            name,
            solution.install_type.to_string(),
            solution.port,
            solution.repo_url,
            solution.branch_name
        );
    }
}

/// Show the deployment shape of a directory
pub fn detect(dir: &Path, json: bool) -> Result<()> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }

    let structure = RepoStructure::detect(dir);
    if json {
        println!("{}", serde_json::to_string_pretty(&structure)?);
        return Ok(());
    }

    println!(
        "Compose file: {}",
        structure.compose_file_name.as_deref().unwrap_or("none")
    );
    println!(
        "Dockerfile:   {}",
        if structure.has_dockerfile { "yes" } else { "no" }
    );
    match select_strategy(&structure) {
        Some(strategy) => println!("Strategy:     {}", strategy),
        None => println!("Strategy:     none (no deployable configuration)"),
    }
    Ok(())
}

/// Print `root` merged over `local`
pub fn merge_env(root: &Path, local: &Path) -> Result<()> {
    let root = EnvironmentMap::read(root)?;
    let local = EnvironmentMap::read(local)?;
    println!("{}", merge(&root, &local).render());
    Ok(())
}

/// Print the config location and effective configuration
pub fn config(config: &GlobalConfig, path: &Path) -> Result<()> {
    println!("# Config file: {}", path.display());
    if !path.exists() {
        println!("# (not found, showing defaults)");
    }
    println!("# Workspace root: {}", config.workspace_root()?.display());
    println!("# Root env file: {}", config.root_env_file()?.display());
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
