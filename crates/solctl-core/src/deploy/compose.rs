//! Multi-container deployment via docker compose

use super::envfiles::{copy_env_file, remove_temp_file, reset_all_env_files};
use super::{select_strategy, Deployer, DeploymentStrategy};
use crate::phase::{enter_phase, send_progress};
use crate::{merge_files, CoreError, InstallPhase, RepoStructure, Result};
use solctl_config::{working_env_for, SolutionConfig};
use solctl_runner::ShellCommand;
use std::ffi::OsString;
use std::path::Path;

/// Which compose binary is available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeTool {
    /// `docker compose` (CLI plugin)
    Plugin,
    /// `docker-compose` (standalone)
    Standalone,
}

impl ComposeTool {
    /// Probe order
    pub const ALL: [ComposeTool; 2] = [ComposeTool::Plugin, ComposeTool::Standalone];

    /// Base command, without a subcommand
    pub fn command(&self) -> ShellCommand {
        match self {
            ComposeTool::Plugin => ShellCommand::new("docker").arg("compose"),
            ComposeTool::Standalone => ShellCommand::new("docker-compose"),
        }
    }
}

impl Deployer<'_> {
    /// Deploy a checkout whose install type is `multi`.
    ///
    /// Resets every example-env file in the tree, merges the root env over the
    /// top-level working env, then runs compose when a compose file exists or
    /// falls back to the single-container path when only a Dockerfile does.
    pub(crate) async fn deploy_multi(
        &self,
        checkout: &Path,
        config: &SolutionConfig,
    ) -> Result<DeploymentStrategy> {
        let example_name: OsString = config
            .env_file
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from(".env.example"));
        let working = checkout.join(working_env_for(Path::new(&example_name)));
        let temp = self.constants.temp_file_for(&working);

        reset_all_env_files(checkout, &example_name)?;
        merge_files(&self.root_env_file, &working, &temp)?;

        enter_phase(self.progress, InstallPhase::DetectingStructure);
        let structure = RepoStructure::detect(checkout);

        match select_strategy(&structure) {
            Some(DeploymentStrategy::Compose { file }) => {
                enter_phase(self.progress, InstallPhase::Deploying);
                let tool = self.ensure_compose_tool().await;

                copy_env_file(&temp, &working)?;

                send_progress(self.progress, "Running compose up...");
                let up = tool
                    .command()
                    .args(["-f", file.as_str(), "up", "--build", "-d"])
                    .current_dir(checkout);
                self.runner.run(&up).await?;

                enter_phase(self.progress, InstallPhase::Restoring);
                reset_all_env_files(checkout, &example_name)?;
                remove_temp_file(&temp)?;

                tracing::info!("Compose project in {:?} is up", checkout);
                Ok(DeploymentStrategy::Compose { file })
            }
            Some(DeploymentStrategy::SingleContainer) => {
                tracing::info!("No compose file found, falling back to Dockerfile");
                remove_temp_file(&temp)?;
                enter_phase(self.progress, InstallPhase::Deploying);
                self.deploy_single(checkout, config).await?;
                Ok(DeploymentStrategy::SingleContainer)
            }
            None => Err(CoreError::NoDeployableDescriptor(checkout.to_path_buf())),
        }
    }

    /// Find a working compose tool, trying to install one if neither variant
    /// answers. Never fails; defaults to the plugin form.
    pub async fn ensure_compose_tool(&self) -> ComposeTool {
        if let Some(tool) = self.probe_compose_tool().await {
            return tool;
        }

        if self.compose_install_command.trim().is_empty() {
            tracing::warn!("No compose tool found and no install command configured");
            return ComposeTool::Plugin;
        }

        send_progress(self.progress, "Installing docker compose...");
        let install = ShellCommand::script(self.compose_install_command.as_str());
        if let Err(e) = self.runner.run(&install).await {
            tracing::warn!("Installing docker compose failed: {}", e);
        }

        match self.probe_compose_tool().await {
            Some(tool) => tool,
            None => {
                tracing::warn!("docker compose still unavailable, trying it anyway");
                ComposeTool::Plugin
            }
        }
    }

    async fn probe_compose_tool(&self) -> Option<ComposeTool> {
        for tool in ComposeTool::ALL {
            if self.runner.succeeds(&tool.command().arg("version")).await {
                tracing::debug!("Using compose tool: {}", tool.command());
                return Some(tool);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::ErrorKind;
    use solctl_config::{DeployConstants, InstallType};
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    fn setup() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let root_env = tmp.path().join(".env");
        let checkout = tmp.path().join("chat");
        write_file(&root_env, "A=1\nB=2\n");
        write_file(&checkout.join(".env.example"), "B=\nC=3\n");
        write_file(&checkout.join("api/.env.example"), "API=example\n");
        write_file(&checkout.join("api/.env"), "API=stale-secret\n");
        (tmp, root_env, checkout)
    }

    #[tokio::test]
    async fn test_compose_preferred_over_dockerfile() {
        let (_tmp, root_env, checkout) = setup();
        write_file(&checkout.join("docker-compose.yml"), "services: {}\n");
        write_file(&checkout.join("Dockerfile"), "FROM scratch\n");
        let runner = MockRunner::new();
        let seen = Arc::new(Mutex::new(String::new()));
        {
            let seen = seen.clone();
            let working = checkout.join(".env");
            runner.on("docker compose -f", move |_| {
                *seen.lock().unwrap() = std::fs::read_to_string(&working).unwrap();
            });
        }
        let config = sample_solution(InstallType::Multi);

        let strategy = Deployer::new(&runner, DeployConstants::default(), &root_env)
            .deploy("chat", &checkout, &config)
            .await
            .unwrap();

        assert_eq!(
            strategy,
            DeploymentStrategy::Compose {
                file: "docker-compose.yml".to_string()
            }
        );
        assert!(!runner.was_run("docker build"));
        assert!(runner.was_run("docker compose -f docker-compose.yml up --build -d"));
        assert_eq!(*seen.lock().unwrap(), "A=1\nB=2\nC=3");

        // Everything restored from the examples afterwards
        assert_eq!(std::fs::read_to_string(checkout.join(".env")).unwrap(), "B=\nC=3\n");
        assert_eq!(
            std::fs::read_to_string(checkout.join("api/.env")).unwrap(),
            "API=example\n"
        );
        assert!(!checkout.join(".env.temp").exists());
    }

    #[tokio::test]
    async fn test_compose_runs_in_checkout() {
        let (_tmp, root_env, checkout) = setup();
        write_file(&checkout.join("compose.yaml"), "services: {}\n");
        let runner = MockRunner::new();
        let config = sample_solution(InstallType::Multi);

        Deployer::new(&runner, DeployConstants::default(), &root_env)
            .deploy("chat", &checkout, &config)
            .await
            .unwrap();

        let up = runner
            .get_calls()
            .into_iter()
            .find(|c| c.line().contains(" up --build -d"))
            .unwrap();
        assert_eq!(up.working_dir(), Some(checkout.as_path()));
        assert!(up.line().contains("-f compose.yaml"));
    }

    #[tokio::test]
    async fn test_falls_back_to_dockerfile() {
        let (_tmp, root_env, checkout) = setup();
        write_file(&checkout.join("Dockerfile"), "FROM scratch\n");
        let runner = MockRunner::new();
        let config = sample_solution(InstallType::Multi);

        let strategy = Deployer::new(&runner, DeployConstants::default(), &root_env)
            .deploy("chat", &checkout, &config)
            .await
            .unwrap();

        assert_eq!(strategy, DeploymentStrategy::SingleContainer);
        assert!(runner.was_run("docker build -t chat-image ."));
        assert!(!runner.was_run("docker compose"));
        assert_eq!(std::fs::read_to_string(checkout.join(".env")).unwrap(), "B=\nC=3\n");
        assert!(!checkout.join(".env.temp").exists());
    }

    #[tokio::test]
    async fn test_nothing_to_deploy() {
        let (_tmp, root_env, checkout) = setup();
        let runner = MockRunner::new();
        let config = sample_solution(InstallType::Multi);

        let err = Deployer::new(&runner, DeployConstants::default(), &root_env)
            .deploy("chat", &checkout, &config)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Structure);
        assert!(runner.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_standalone_compose_used_when_plugin_missing() {
        let (_tmp, root_env, checkout) = setup();
        write_file(&checkout.join("compose.yml"), "services: {}\n");
        let runner = MockRunner::new();
        runner.fail_on("docker compose version", 1);
        let config = sample_solution(InstallType::Multi);

        Deployer::new(&runner, DeployConstants::default(), &root_env)
            .deploy("chat", &checkout, &config)
            .await
            .unwrap();

        assert!(runner.was_run("docker-compose -f compose.yml up --build -d"));
    }

    #[tokio::test]
    async fn test_install_failure_is_tolerated() {
        let (_tmp, root_env, checkout) = setup();
        write_file(&checkout.join("compose.yml"), "services: {}\n");
        let runner = MockRunner::new();
        runner.fail_on("docker compose version", 1);
        runner.fail_on("docker-compose version", 127);
        runner.fail_on("install-compose", 1);
        let config = sample_solution(InstallType::Multi);

        Deployer::new(&runner, DeployConstants::default(), &root_env)
            .with_compose_install_command("install-compose")
            .deploy("chat", &checkout, &config)
            .await
            .unwrap();

        let install = runner.position("install-compose").unwrap();
        let up = runner.position("docker compose -f").unwrap();
        assert!(install < up);
    }

    #[tokio::test]
    async fn test_compose_up_failure_propagates() {
        let (_tmp, root_env, checkout) = setup();
        write_file(&checkout.join("compose.yml"), "services: {}\n");
        let runner = MockRunner::new();
        runner.fail_on("docker compose -f", 1);
        let config = sample_solution(InstallType::Multi);

        let err = Deployer::new(&runner, DeployConstants::default(), &root_env)
            .deploy("chat", &checkout, &config)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(checkout.join(".env.temp").exists());
    }

    #[tokio::test]
    async fn test_ensure_compose_tool_without_install_command() {
        let runner = MockRunner::new();
        runner.fail_on("docker", 1);
        let deployer = Deployer::new(&runner, DeployConstants::default(), "/nonexistent/.env");

        assert_eq!(deployer.ensure_compose_tool().await, ComposeTool::Plugin);
        assert_eq!(runner.get_calls().len(), 2);
    }

    #[test]
    fn test_compose_tool_commands() {
        assert_eq!(ComposeTool::Plugin.command().line(), "docker compose");
        assert_eq!(ComposeTool::Standalone.command().line(), "docker-compose");
    }
}
