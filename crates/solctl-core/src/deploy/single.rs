//! Single-container deployment: `docker build` + `docker run`

use super::envfiles::{copy_env_file, remove_temp_file, restore_env_file};
use super::Deployer;
use crate::phase::{enter_phase, send_progress};
use crate::{merge_files, InstallPhase, Result};
use solctl_config::SolutionConfig;
use solctl_runner::ShellCommand;
use std::path::Path;

impl Deployer<'_> {
    /// Build the checkout's Dockerfile and run it on the shared network.
    ///
    /// 1. Reset the working env file from the example
    /// 2. Merge the root env over it into the temp file
    /// 3. Copy the temp file over the working env file
    /// 4. Build the image and run the container
    /// 5. Restore the working env file from the example, delete the temp file
    pub(crate) async fn deploy_single(&self, checkout: &Path, config: &SolutionConfig) -> Result<()> {
        let example = checkout.join(&config.env_file);
        let working = checkout.join(config.working_env_file());
        let temp = self.constants.temp_file_for(&working);

        restore_env_file(&example, &working)?;
        merge_files(&self.root_env_file, &working, &temp)?;
        copy_env_file(&temp, &working)?;

        self.ensure_network().await;

        send_progress(self.progress, &format!("Building image {}...", config.image_name));
        let build = ShellCommand::new("docker")
            .args(["build", "-t", config.image_name.as_str(), "."])
            .current_dir(checkout);
        self.runner.run(&build).await?;

        send_progress(
            self.progress,
            &format!("Starting container {}...", config.container_name),
        );
        let ports = format!("{}:{}", config.port, config.port);
        let run = ShellCommand::new("docker")
            .args(["run", "-d", "--name", config.container_name.as_str()])
            .args(["--network", self.constants.network.as_str()])
            .args(["-p", ports.as_str()])
            .arg(&config.image_name);
        self.runner.run(&run).await?;

        enter_phase(self.progress, InstallPhase::Restoring);
        restore_env_file(&example, &working)?;
        remove_temp_file(&temp)?;

        tracing::info!(
            "Container '{}' running on port {}",
            config.container_name,
            config.port
        );
        Ok(())
    }

    /// Create the shared network unless it already exists. Failures are
    /// logged; `docker run` reports a missing network on its own.
    pub(crate) async fn ensure_network(&self) {
        let network = self.constants.network.as_str();
        let inspect = ShellCommand::new("docker").args(["network", "inspect", network]);
        if self.runner.succeeds(&inspect).await {
            return;
        }

        tracing::info!("Creating docker network '{}'", network);
        let create = ShellCommand::new("docker").args(["network", "create", network]);
        if let Err(e) = self.runner.run(&create).await {
            tracing::warn!("Could not create network '{}': {}", network, e);
        }
    }
}
