//! Test support utilities for solctl-core
//!
//! Provides MockRunner and helpers for unit testing the installer without
//! git or a container runtime.

use async_trait::async_trait;
use solctl_config::{InstallType, SolutionConfig};
use solctl_runner::{ExecutionError, ProcessRunner, Result, ShellCommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

type Hook = Arc<dyn Fn(&ShellCommand) + Send + Sync>;

#[derive(Clone)]
enum Failure {
    Exit(i32),
    Spawn,
}

/// Recording process runner.
///
/// Every command is recorded. Hooks registered with [`MockRunner::on`] run
/// for matching commands (to fake a clone, for instance), then the first
/// matching failure rule decides the result. Captured output comes from
/// [`MockRunner::respond`], empty by default. Matching is by line prefix.
/// Clones share state, so a clone kept by the test sees calls made through a
/// boxed copy.
#[derive(Clone, Default)]
pub struct MockRunner {
    pub calls: Arc<Mutex<Vec<ShellCommand>>>,
    failures: Arc<Mutex<Vec<(String, Failure)>>>,
    hooks: Arc<Mutex<Vec<(String, Hook)>>>,
    outputs: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` exit with `code`
    pub fn fail_on(&self, prefix: &str, code: i32) {
        self.failures
            .lock()
            .unwrap()
            .push((prefix.to_string(), Failure::Exit(code)));
    }

    /// Commands starting with `prefix` fail to spawn
    pub fn spawn_fail_on(&self, prefix: &str) {
        self.failures
            .lock()
            .unwrap()
            .push((prefix.to_string(), Failure::Spawn));
    }

    /// Run `hook` whenever a command starting with `prefix` is run
    pub fn on(&self, prefix: &str, hook: impl Fn(&ShellCommand) + Send + Sync + 'static) {
        self.hooks
            .lock()
            .unwrap()
            .push((prefix.to_string(), Arc::new(hook)));
    }

    /// Commands starting with `prefix` print `stdout` when captured
    pub fn respond(&self, prefix: &str, stdout: &str) {
        self.outputs
            .lock()
            .unwrap()
            .push((prefix.to_string(), stdout.to_string()));
    }

    /// Get all recorded commands
    pub fn get_calls(&self) -> Vec<ShellCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded command lines
    pub fn lines(&self) -> Vec<String> {
        self.get_calls().iter().map(|c| c.line().to_string()).collect()
    }

    /// Check if any command starting with `prefix` was run
    pub fn was_run(&self, prefix: &str) -> bool {
        self.lines().iter().any(|l| l.starts_with(prefix))
    }

    /// Position of the first command starting with `prefix`
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.lines().iter().position(|l| l.starts_with(prefix))
    }
}

#[async_trait]
impl ProcessRunner for MockRunner {
    async fn run(&self, command: &ShellCommand) -> Result<()> {
        self.calls.lock().unwrap().push(command.clone());

        let hooks: Vec<Hook> = self
            .hooks
            .lock()
            .unwrap()
            .iter()
            .filter(|(prefix, _)| command.line().starts_with(prefix.as_str()))
            .map(|(_, hook)| hook.clone())
            .collect();
        for hook in hooks {
            hook(command);
        }

        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| command.line().starts_with(prefix.as_str()))
            .map(|(_, f)| f.clone());

        match failure {
            None => Ok(()),
            Some(Failure::Exit(code)) => Err(ExecutionError::NonZeroExit {
                command: command.to_string(),
                exit_code: Some(code),
            }),
            Some(Failure::Spawn) => Err(ExecutionError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            }),
        }
    }

    async fn output(&self, command: &ShellCommand) -> Result<String> {
        self.run(command).await?;
        Ok(self
            .outputs
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| command.line().starts_with(prefix.as_str()))
            .map(|(_, stdout)| stdout.clone())
            .unwrap_or_default())
    }
}

/// A registry entry named `chat` with the given install type
pub fn sample_solution(install_type: InstallType) -> SolutionConfig {
    SolutionConfig {
        repo_url: "https://github.com/example/chat.git".to_string(),
        branch_name: "main".to_string(),
        repo_name: "chat".to_string(),
        install_type,
        container_name: "chat-app".to_string(),
        image_name: "chat-image".to_string(),
        port: 3000,
        additional_ports: BTreeSet::new(),
        env_file: PathBuf::from(".env.example"),
    }
}

/// Write `content` to `path`, creating parent directories
pub fn write_file(path: &std::path::Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}
