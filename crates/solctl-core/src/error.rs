//! Error types for solctl-core

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    Config(#[from] solctl_config::ConfigError),

    #[error("Unknown solution type: {0}")]
    UnknownSolution(String),

    #[error("Unsupported install type '{install_type}' for solution '{solution}'")]
    UnsupportedInstallType {
        solution: String,
        install_type: String,
    },

    #[error(transparent)]
    Execution(#[from] solctl_runner::ExecutionError),

    #[error("No deployable configuration in {0}: no compose file or Dockerfile found")]
    NoDeployableDescriptor(PathBuf),

    #[error("Env file error at {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Broad class of a [`CoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown solution, unsupported install type, bad config file
    Configuration,
    /// An external command failed or could not start
    Execution,
    /// The checkout has nothing to deploy
    Structure,
    /// Local filesystem failure
    Io,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Config(_)
            | CoreError::UnknownSolution(_)
            | CoreError::UnsupportedInstallType { .. } => ErrorKind::Configuration,
            CoreError::Execution(_) => ErrorKind::Execution,
            CoreError::NoDeployableDescriptor(_) => ErrorKind::Structure,
            CoreError::EnvFile { .. } | CoreError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn env_file(path: &std::path::Path, source: std::io::Error) -> Self {
        CoreError::EnvFile {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
