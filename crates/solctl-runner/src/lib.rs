//! Process execution for solctl
//!
//! Every external tool (git, docker, docker compose) is reached through the
//! [`ProcessRunner`] trait. [`ShellRunner`] is the real implementation; the
//! core crate swaps in a recording mock for tests.

mod command;
mod error;

pub use command::*;
pub use error::*;

use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// Trait for anything that can run a shell command to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command, streaming its output, and wait for it to exit.
    ///
    /// Succeeds only on exit code 0. No retries.
    async fn run(&self, command: &ShellCommand) -> Result<()>;

    /// Run a command and capture its stdout. Stderr still streams to the
    /// caller; a non-zero exit is an error like in [`ProcessRunner::run`].
    async fn output(&self, command: &ShellCommand) -> Result<String>;

    /// Run a command and report only whether it succeeded
    async fn succeeds(&self, command: &ShellCommand) -> bool {
        match self.run(command).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("{}", e);
                false
            }
        }
    }
}

/// Runs commands through `sh -c` with inherited stderr.
///
/// Arguments are quoted for a POSIX shell, so this needs `sh` on the PATH.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    fn shell(command: &ShellCommand) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command.line());
        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stderr(Stdio::inherit());
        cmd
    }
}

fn check_status(command: &ShellCommand, status: ExitStatus) -> Result<()> {
    if status.success() {
        Ok(())
    } else {
        Err(ExecutionError::NonZeroExit {
            command: command.to_string(),
            exit_code: status.code(),
        })
    }
}

fn spawn_error(command: &ShellCommand, source: std::io::Error) -> ExecutionError {
    ExecutionError::Spawn {
        command: command.to_string(),
        source,
    }
}

#[async_trait]
impl ProcessRunner for ShellRunner {
    async fn run(&self, command: &ShellCommand) -> Result<()> {
        tracing::debug!("$ {}", command);

        let status = Self::shell(command)
            .stdout(Stdio::inherit())
            .status()
            .await
            .map_err(|e| spawn_error(command, e))?;

        check_status(command, status)
    }

    async fn output(&self, command: &ShellCommand) -> Result<String> {
        tracing::debug!("$ {}", command);

        let output = Self::shell(command)
            .stdout(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(command, e))?;

        check_status(command, output.status)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_success() {
        let runner = ShellRunner::new();
        runner.run(&ShellCommand::script("true")).await.unwrap();
    }

    #[tokio::test]
    async fn test_run_reports_exit_code() {
        let runner = ShellRunner::new();
        let err = runner
            .run(&ShellCommand::script("exit 3"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(err.command(), "exit 3");
        assert!(err.to_string().contains("exit code 3"));
    }

    #[tokio::test]
    async fn test_run_in_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new();
        runner
            .run(&ShellCommand::script("touch marker").current_dir(tmp.path()))
            .await
            .unwrap();
        assert!(tmp.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_spawn_failure_in_missing_directory() {
        let runner = ShellRunner::new();
        let cmd = ShellCommand::script("true").current_dir("/definitely/not/here");
        let err = runner.run(&cmd).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }

    #[tokio::test]
    async fn test_output_captures_stdout() {
        let runner = ShellRunner::new();
        let out = runner
            .output(&ShellCommand::new("printf").arg("abc\\n123\\n"))
            .await
            .unwrap();
        assert_eq!(out, "abc\n123\n");
    }

    #[tokio::test]
    async fn test_output_fails_on_non_zero_exit() {
        let runner = ShellRunner::new();
        let err = runner
            .output(&ShellCommand::script("echo partial; exit 1"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
    }

    #[tokio::test]
    async fn test_arguments_with_spaces_reach_program_intact() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = ShellRunner::new();
        let dir = tmp.path().join("my repo");
        runner
            .run(&ShellCommand::new("mkdir").path_arg(&dir))
            .await
            .unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_succeeds() {
        let runner = ShellRunner::new();
        assert!(runner.succeeds(&ShellCommand::script("true")).await);
        assert!(!runner.succeeds(&ShellCommand::script("false")).await);
    }
}
