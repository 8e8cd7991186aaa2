//! Deployment strategies
//!
//! A checkout is deployed either as one container built from its Dockerfile
//! or as a compose project. `install_type = "single"` always takes the
//! single-container path; `"multi"` inspects the checkout and prefers a
//! compose file over a Dockerfile.

mod compose;
mod envfiles;
mod single;

pub use compose::ComposeTool;
pub use envfiles::{find_example_files, reset_all_env_files, restore_env_file};

use crate::phase::enter_phase;
use crate::{CoreError, InstallPhase, RepoStructure, Result};
use serde::Serialize;
use solctl_config::{DeployConstants, InstallType, SolutionConfig};
use solctl_runner::ProcessRunner;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// The strategy a deployment ended up using
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeploymentStrategy {
    /// `docker build` + `docker run`
    SingleContainer,
    /// `compose up --build -d` with the given compose file
    Compose { file: String },
}

impl fmt::Display for DeploymentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentStrategy::SingleContainer => write!(f, "single container"),
            DeploymentStrategy::Compose { file } => write!(f, "compose ({})", file),
        }
    }
}

/// Pick the strategy for a detected structure. Compose wins over a bare
/// Dockerfile; `None` means there is nothing to deploy.
pub fn select_strategy(structure: &RepoStructure) -> Option<DeploymentStrategy> {
    match (&structure.compose_file_name, structure.has_dockerfile) {
        (Some(file), _) => Some(DeploymentStrategy::Compose { file: file.clone() }),
        (None, true) => Some(DeploymentStrategy::SingleContainer),
        (None, false) => None,
    }
}

/// Drives a deployment of one checkout
pub struct Deployer<'a> {
    runner: &'a dyn ProcessRunner,
    constants: DeployConstants,
    root_env_file: PathBuf,
    compose_install_command: String,
    progress: Option<&'a mpsc::UnboundedSender<String>>,
}

impl<'a> Deployer<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        constants: DeployConstants,
        root_env_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            constants,
            root_env_file: root_env_file.into(),
            compose_install_command: String::new(),
            progress: None,
        }
    }

    /// Shell line to run when no compose tool is available
    pub fn with_compose_install_command(mut self, command: impl Into<String>) -> Self {
        self.compose_install_command = command.into();
        self
    }

    pub fn with_progress(mut self, progress: Option<&'a mpsc::UnboundedSender<String>>) -> Self {
        self.progress = progress;
        self
    }

    pub fn constants(&self) -> &DeployConstants {
        &self.constants
    }

    /// Deploy `checkout` with the strategy its install type selects
    pub async fn deploy(
        &self,
        solution_type: &str,
        checkout: &Path,
        config: &SolutionConfig,
    ) -> Result<DeploymentStrategy> {
        match config.install_type {
            InstallType::Single => {
                enter_phase(self.progress, InstallPhase::Deploying);
                self.deploy_single(checkout, config).await?;
                Ok(DeploymentStrategy::SingleContainer)
            }
            InstallType::Multi => self.deploy_multi(checkout, config).await,
            InstallType::Unsupported => Err(CoreError::UnsupportedInstallType {
                solution: solution_type.to_string(),
                install_type: config.install_type.to_string(),
            }),
        }
    }
}
