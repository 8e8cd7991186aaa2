//! Global configuration for solctl
//!
//! Located at `~/.config/solctl/config.toml`

use crate::{ConfigError, DeployConstants, Result, SolutionConfig};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Global solctl configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub defaults: DefaultsConfig,
    /// Solution registry, keyed by solution type
    pub solutions: BTreeMap<String, SolutionConfig>,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Directory checkouts are cloned into (`~` is expanded).
    /// Defaults to `<data dir>/solutions`.
    pub workspace_root: Option<String>,
    /// Root env file merged over every checkout's env.
    /// Defaults to `<workspace_root>/.env`.
    pub root_env_file: Option<String>,
    /// Docker network single-container deployments join
    pub network: String,
    /// Suffix of the merge side file next to each working env file
    pub temp_suffix: String,
    /// Shell line run when no compose tool is found (empty disables it)
    pub compose_install_command: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let constants = DeployConstants::default();
        Self {
            workspace_root: None,
            root_env_file: None,
            network: constants.network,
            temp_suffix: constants.temp_suffix,
            compose_install_command:
                "apt-get update && apt-get install -y docker-compose-plugin".to_string(),
        }
    }
}

impl GlobalConfig {
    /// Load global configuration from the default path
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load global configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            ConfigError::TomlParseError { source, .. } => ConfigError::TomlParseError {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        tracing::debug!(
            "Loaded config from {:?}: {} solution(s)",
            path,
            config.solutions.len()
        );

        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            path: PathBuf::new(),
            source: e,
        })?;

        for (solution_type, solution) in &config.solutions {
            solution.validate(solution_type)?;
        }
        if config.defaults.temp_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "defaults.temp_suffix must not be empty".to_string(),
            ));
        }
        if config.defaults.network.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "defaults.network must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let content = self.to_toml()?;

        std::fs::write(path, content).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "solctl").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "solctl").ok_or(ConfigError::NoDataDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Directory solution checkouts live in
    pub fn workspace_root(&self) -> Result<PathBuf> {
        match self.defaults.workspace_root {
            Some(ref root) => Ok(expand(root)),
            None => Ok(Self::data_dir()?.join("solutions")),
        }
    }

    /// Root env file, outside every checkout
    pub fn root_env_file(&self) -> Result<PathBuf> {
        match self.defaults.root_env_file {
            Some(ref path) => Ok(expand(path)),
            None => Ok(self.workspace_root()?.join(".env")),
        }
    }

    /// Network name and temp suffix for the deploy strategies
    pub fn deploy_constants(&self) -> DeployConstants {
        DeployConstants {
            network: self.defaults.network.clone(),
            temp_suffix: self.defaults.temp_suffix.clone(),
        }
    }

    /// Look up a solution by type
    pub fn solution(&self, solution_type: &str) -> Option<&SolutionConfig> {
        self.solutions.get(solution_type)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstallType;

    const SAMPLE: &str = r#"
[defaults]
workspace_root = "/srv/solutions"
network = "ai-net"

[solutions.chat]
repo_url = "https://github.com/example/chat.git"
branch_name = "release"
repo_name = "chat"
install_type = "multi"
container_name = "chat"
image_name = "chat:latest"
port = 3000
additional_ports = [3001, 5432]

[solutions.search]
repo_url = "https://github.com/example/search.git"
repo_name = "search"
install_type = "single"
container_name = "search"
image_name = "search"
port = 8080
"#;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert!(config.solutions.is_empty());
        assert_eq!(config.defaults.network, "solutions-network");
        assert_eq!(config.defaults.temp_suffix, ".temp");
        assert!(config.defaults.workspace_root.is_none());
    }

    #[test]
    fn test_parse_config() {
        let config = GlobalConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.workspace_root().unwrap(), PathBuf::from("/srv/solutions"));
        assert_eq!(
            config.root_env_file().unwrap(),
            PathBuf::from("/srv/solutions/.env")
        );
        assert_eq!(config.deploy_constants().network, "ai-net");
        assert_eq!(config.deploy_constants().temp_suffix, ".temp");

        let chat = config.solution("chat").unwrap();
        assert_eq!(chat.install_type, InstallType::Multi);
        assert_eq!(chat.branch_name, "release");
        assert_eq!(chat.additional_ports.iter().copied().collect::<Vec<_>>(), vec![3001, 5432]);

        let search = config.solution("search").unwrap();
        assert_eq!(search.branch_name, "main");
        assert_eq!(search.env_file, PathBuf::from(".env.example"));
        assert!(search.additional_ports.is_empty());

        assert!(config.solution("missing").is_none());
    }

    #[test]
    fn test_parse_rejects_invalid_solution() {
        let toml = r#"
[solutions.bad]
repo_url = "https://github.com/example/bad.git"
repo_name = "nested/dir"
install_type = "single"
container_name = "bad"
image_name = "bad"
port = 80
"#;
        let err = GlobalConfig::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = GlobalConfig::load_from(&tmp.path().join("absent.toml")).unwrap();
        assert!(config.solutions.is_empty());
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[defaults\n").unwrap();
        let err = GlobalConfig::load_from(&path).unwrap_err();
        match err {
            ConfigError::TomlParseError { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = GlobalConfig::parse(SAMPLE).unwrap();
        config.save_to(&path).unwrap();

        let reloaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.solutions, config.solutions);
        assert_eq!(reloaded.defaults.network, "ai-net");
    }
}
