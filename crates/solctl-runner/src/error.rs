//! Error types for process execution

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command `{command}` exited with {}", describe_exit(.exit_code))]
    NonZeroExit {
        command: String,
        /// `None` when the process was terminated by a signal
        exit_code: Option<i32>,
    },

    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

impl ExecutionError {
    /// Command line that failed
    pub fn command(&self) -> &str {
        match self {
            ExecutionError::NonZeroExit { command, .. } => command,
            ExecutionError::Spawn { command, .. } => command,
        }
    }

    /// Exit code, if the process ran and exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecutionError::NonZeroExit { exit_code, .. } => *exit_code,
            ExecutionError::Spawn { .. } => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "a signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ExecutionError>;
