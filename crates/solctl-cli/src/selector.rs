//! Interactive solution selector for CLI commands

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use solctl_config::GlobalConfig;

/// Ask the user which registered solution to install
pub fn select_solution(config: &GlobalConfig) -> Result<String> {
    let names: Vec<&String> = config.solutions.keys().collect();

    if names.is_empty() {
        bail!("No solutions registered. Add a [solutions.<type>] table to the config file.");
    }

    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        bail!("No solution given. Pass one of: {}", join(&names));
    }

    let items: Vec<String> = names
        .iter()
        .map(|name| {
            let solution = &config.solutions[*name];
            format!("{} ({}, port {})", name, solution.install_type, solution.port)
        })
        .collect();

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a solution to install")
        .items(&items)
        .default(0)
        .interact()?;

    Ok(names[selection].clone())
}

fn join(names: &[&String]) -> String {
    names
        .iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
