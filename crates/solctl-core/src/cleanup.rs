//! Best-effort cleanup of a previous deployment

use solctl_config::SolutionConfig;
use solctl_runner::{ProcessRunner, ShellCommand};

/// Outcome of a cleanup pass. Cleanup itself never fails; steps that did
/// are listed here and logged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Human-readable description of each step that failed
    pub failures: Vec<String>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Removes containers and frees ports left over from earlier installs
pub struct ContainerCleaner<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> ContainerCleaner<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        Self { runner }
    }

    /// Remove the solution's container and stop whatever publishes its
    /// additional ports.
    ///
    /// `docker rm -f` matches the name exactly and treats a missing
    /// container as removed, so a non-zero exit is a real failure.
    pub async fn cleanup(&self, config: &SolutionConfig) -> CleanupReport {
        let mut report = CleanupReport::default();

        let remove = ShellCommand::new("docker")
            .args(["rm", "-f"])
            .arg(&config.container_name);
        if let Err(e) = self.runner.run(&remove).await {
            tracing::warn!(
                "Could not remove container '{}': {}",
                config.container_name,
                e
            );
            report
                .failures
                .push(format!("remove container {}: {}", config.container_name, e));
        }

        for port in &config.additional_ports {
            if let Err(e) = self.free_port(*port).await {
                tracing::warn!("Could not stop containers on port {}: {}", port, e);
                report.failures.push(format!("free port {}: {}", port, e));
            }
        }

        if report.is_clean() {
            tracing::debug!("Cleanup for '{}' finished", config.container_name);
        }
        report
    }

    /// Stop every container publishing `port`
    async fn free_port(&self, port: u16) -> solctl_runner::Result<()> {
        let list = ShellCommand::new("docker")
            .args(["ps", "-q", "--filter"])
            .arg(format!("publish={}", port));
        let ids: Vec<String> = self
            .runner
            .output(&list)
            .await?
            .split_whitespace()
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            return Ok(());
        }

        tracing::info!("Stopping {} container(s) on port {}", ids.len(), port);
        let stop = ShellCommand::new("docker").arg("stop").args(&ids);
        self.runner.run(&stop).await
    }
}
