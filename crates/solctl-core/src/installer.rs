//! Installation sequence: resolve, fetch, clean up, deploy, report

use crate::phase::{enter_phase, send_progress};
use crate::{ContainerCleaner, CoreError, Deployer, DeploymentStrategy, InstallPhase, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use solctl_config::{GlobalConfig, InstallType, SolutionConfig};
use solctl_runner::{ProcessRunner, ShellCommand};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// What a successful installation reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentResult {
    pub success: bool,
    pub port: u16,
    pub solution_type: String,
    pub strategy: DeploymentStrategy,
    pub checkout: PathBuf,
    pub finished_at: DateTime<Utc>,
}

/// Installs solutions from the registry in a [`GlobalConfig`].
///
/// Runs one installation at a time per call; installing the same solution
/// concurrently shares a checkout path and container name, so callers must
/// serialize that.
pub struct Installer {
    config: GlobalConfig,
    runner: Box<dyn ProcessRunner>,
}

impl Installer {
    pub fn new(config: GlobalConfig, runner: Box<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Look up a solution and check its install type is one we can deploy
    pub fn resolve(&self, solution_type: &str) -> Result<&SolutionConfig> {
        let solution = self
            .config
            .solution(solution_type)
            .ok_or_else(|| CoreError::UnknownSolution(solution_type.to_string()))?;

        if solution.install_type == InstallType::Unsupported {
            return Err(CoreError::UnsupportedInstallType {
                solution: solution_type.to_string(),
                install_type: solution.install_type.to_string(),
            });
        }
        Ok(solution)
    }

    /// Where a solution is checked out
    pub fn checkout_path(&self, solution: &SolutionConfig) -> Result<PathBuf> {
        Ok(self.config.workspace_root()?.join(&solution.repo_name))
    }

    /// Install a solution end to end.
    ///
    /// Each step aborts the rest on failure, except cleanup, which is
    /// best-effort. Errors are logged before being returned.
    pub async fn install(
        &self,
        solution_type: &str,
        progress: Option<&mpsc::UnboundedSender<String>>,
    ) -> Result<DeploymentResult> {
        match self.run_install(solution_type, progress).await {
            Ok(result) => {
                enter_phase(progress, InstallPhase::Done);
                Ok(result)
            }
            Err(e) => {
                tracing::error!("Installing '{}' failed: {}", solution_type, e);
                enter_phase(progress, InstallPhase::Failed);
                Err(e)
            }
        }
    }

    async fn run_install(
        &self,
        solution_type: &str,
        progress: Option<&mpsc::UnboundedSender<String>>,
    ) -> Result<DeploymentResult> {
        let solution = self.resolve(solution_type)?;
        let checkout = self.checkout_path(solution)?;
        let root_env_file = self.config.root_env_file()?;

        tracing::info!(
            "Installing '{}' ({}) from {} [{}]",
            solution_type,
            solution.install_type,
            solution.repo_url,
            solution.branch_name
        );

        enter_phase(progress, InstallPhase::Fetching);
        self.fetch(solution, &checkout).await?;

        enter_phase(progress, InstallPhase::CleaningUp);
        let report = ContainerCleaner::new(self.runner.as_ref())
            .cleanup(solution)
            .await;
        if !report.is_clean() {
            send_progress(
                progress,
                &format!("Cleanup finished with {} warning(s)", report.failures.len()),
            );
        }

        let strategy = Deployer::new(
            self.runner.as_ref(),
            self.config.deploy_constants(),
            root_env_file,
        )
        .with_compose_install_command(self.config.defaults.compose_install_command.as_str())
        .with_progress(progress)
        .deploy(solution_type, &checkout, solution)
        .await?;

        tracing::info!(
            "Installed '{}' using {} on port {}",
            solution_type,
            strategy,
            solution.port
        );

        Ok(DeploymentResult {
            success: true,
            port: solution.port,
            solution_type: solution_type.to_string(),
            strategy,
            checkout,
            finished_at: Utc::now(),
        })
    }

    /// Replace any previous checkout with a fresh clone of the branch
    async fn fetch(&self, solution: &SolutionConfig, checkout: &Path) -> Result<()> {
        remove_checkout(checkout).await?;
        if let Some(parent) = checkout.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let clone = ShellCommand::new("git")
            .args(["clone", "-b", solution.branch_name.as_str()])
            .arg(&solution.repo_url)
            .path_arg(checkout);
        self.runner.run(&clone).await?;
        Ok(())
    }
}

async fn remove_checkout(checkout: &Path) -> Result<()> {
    match tokio::fs::remove_dir_all(checkout).await {
        Ok(()) => {
            tracing::debug!("Removed previous checkout at {:?}", checkout);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
