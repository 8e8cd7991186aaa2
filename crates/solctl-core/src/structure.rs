//! Repository structure detection

use serde::Serialize;
use std::path::Path;

/// Compose file names, in the order they are looked for
pub const COMPOSE_FILE_NAMES: [&str; 4] = [
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// Single-container build descriptor
pub const DOCKERFILE_NAME: &str = "Dockerfile";

/// Deployment shape of a checkout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoStructure {
    pub has_compose_descriptor: bool,
    pub has_dockerfile: bool,
    /// First compose file found, by [`COMPOSE_FILE_NAMES`] priority
    pub compose_file_name: Option<String>,
}

impl RepoStructure {
    /// Inspect the top level of `dir`
    pub fn detect(dir: &Path) -> Self {
        let compose_file_name = COMPOSE_FILE_NAMES
            .iter()
            .find(|name| dir.join(name).is_file())
            .map(|name| name.to_string());
        let has_dockerfile = dir.join(DOCKERFILE_NAME).is_file();

        let structure = Self {
            has_compose_descriptor: compose_file_name.is_some(),
            has_dockerfile,
            compose_file_name,
        };
        tracing::debug!("Detected structure of {:?}: {:?}", dir, structure);
        structure
    }

    /// Whether either strategy has something to deploy
    pub fn is_deployable(&self) -> bool {
        self.has_compose_descriptor || self.has_dockerfile
    }
}
