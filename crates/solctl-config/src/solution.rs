//! Solution registry entries and deployment constants

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix that marks an example-env file (`.env.example`)
pub const EXAMPLE_SUFFIX: &str = ".example";

/// How a solution is deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallType {
    /// One image built from a Dockerfile, one container
    Single,
    /// Compose project, falling back to a Dockerfile when no compose file exists
    Multi,
    /// Anything else found in the config file; rejected at install time
    #[serde(other)]
    Unsupported,
}

impl fmt::Display for InstallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallType::Single => write!(f, "single"),
            InstallType::Multi => write!(f, "multi"),
            InstallType::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// A deployable solution as registered in `[solutions.<type>]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionConfig {
    /// Git URL to clone
    pub repo_url: String,
    /// Branch to check out
    #[serde(default = "default_branch")]
    pub branch_name: String,
    /// Checkout directory name under the workspace root
    pub repo_name: String,
    pub install_type: InstallType,
    pub container_name: String,
    pub image_name: String,
    /// Port published by the single-container path and reported on success
    pub port: u16,
    /// Ports whose publishing containers are stopped before deploying
    #[serde(default)]
    pub additional_ports: BTreeSet<u16>,
    /// Example-env file, relative to the checkout
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env.example")
}

impl SolutionConfig {
    /// Working env file that the example-env file is copied over
    pub fn working_env_file(&self) -> PathBuf {
        working_env_for(&self.env_file)
    }

    /// Reject entries that would clone outside the workspace or deploy nothing
    pub fn validate(&self, solution_type: &str) -> Result<()> {
        let invalid = |msg: &str| {
            Err(ConfigError::Invalid(format!(
                "solution '{}': {}",
                solution_type, msg
            )))
        };

        if self.repo_url.trim().is_empty() {
            return invalid("repo_url is empty");
        }
        if self.repo_name.is_empty()
            || self.repo_name == "."
            || self.repo_name == ".."
            || self.repo_name.contains(['/', '\\'])
        {
            return invalid("repo_name must be a single directory name");
        }
        if self.container_name.trim().is_empty() {
            return invalid("container_name is empty");
        }
        if self.image_name.trim().is_empty() {
            return invalid("image_name is empty");
        }
        if self.port == 0 {
            return invalid("port must be non-zero");
        }
        if self.env_file.is_absolute() {
            return invalid("env_file must be relative to the checkout");
        }
        Ok(())
    }
}

/// Sibling working env file of an example-env file.
///
/// `.env.example` becomes `.env`, `backend/.env.example` becomes `backend/.env`.
/// A file without the example suffix maps to `.env` in the same directory.
pub fn working_env_for(example: &Path) -> PathBuf {
    let name = example
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let working = match name.strip_suffix(EXAMPLE_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => ".env".to_string(),
    };

    example.with_file_name(working)
}

/// Constants shared by the single- and multi-container strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConstants {
    /// Docker network every single-container deployment joins
    pub network: String,
    /// Suffix appended to a working env file to name its merge side file
    pub temp_suffix: String,
}

impl Default for DeployConstants {
    fn default() -> Self {
        Self {
            network: "solutions-network".to_string(),
            temp_suffix: ".temp".to_string(),
        }
    }
}

impl DeployConstants {
    /// Merge side file for a working env file (`.env` -> `.env.temp`)
    pub fn temp_file_for(&self, working: &Path) -> PathBuf {
        let mut name = working
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.temp_suffix);
        working.with_file_name(name)
    }
}
