//! Install command

use anyhow::Result;
use solctl_config::GlobalConfig;
use solctl_core::Installer;
use solctl_runner::ShellRunner;
use tokio::sync::mpsc;

/// Install a solution and print where it is running
pub async fn install(config: GlobalConfig, solution_type: &str, json: bool) -> Result<()> {
    let installer = Installer::new(config, Box::new(ShellRunner::new()));

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let printer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            eprintln!("==> {}", msg);
        }
    });

    let result = installer.install(solution_type, Some(&tx)).await;
    drop(tx);
    let _ = printer.await;

    let result = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Installed '{}' ({}) on port {}",
            result.solution_type, result.strategy, result.port
        );
        println!("Checkout: {}", result.checkout.display());
    }

    Ok(())
}
