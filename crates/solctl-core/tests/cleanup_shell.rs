//! Cleanup through a real shell, against a stand-in `docker` on PATH.
//!
//! Kept in its own test binary: it rewrites PATH for the whole process.

#![cfg(unix)]

use solctl_config::InstallType;
use solctl_core::test_support::sample_solution;
use solctl_core::ContainerCleaner;
use solctl_runner::ShellRunner;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn install_fake_docker(bin_dir: &Path, script: &str) {
    let path = bin_dir.join("docker");
    std::fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// Single test: every step shares the rewritten PATH
#[tokio::test]
async fn test_cleanup_with_shell_runner() {
    let bin = tempfile::tempdir().unwrap();
    let path = std::env::var("PATH").unwrap_or_default();
    std::env::set_var("PATH", format!("{}:{}", bin.path().display(), path));

    let mut config = sample_solution(InstallType::Single);
    config.additional_ports = [5432].into_iter().collect();
    let runner = ShellRunner::new();

    // Unreachable daemon: both steps fail and both are reported
    install_fake_docker(
        bin.path(),
        "echo 'Cannot connect to the Docker daemon' >&2\nexit 1\n",
    );
    let report = ContainerCleaner::new(&runner).cleanup(&config).await;
    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 2);
    assert!(report.failures[0].starts_with("remove container chat-app"));
    assert!(report.failures[1].starts_with("free port 5432"));

    // Reachable daemon: the listed publisher is stopped
    let log = bin.path().join("calls.log");
    install_fake_docker(
        bin.path(),
        &format!(
            "echo \"$@\" >> '{}'\nif [ \"$1\" = ps ]; then echo abc123; fi\nexit 0\n",
            log.display()
        ),
    );
    let report = ContainerCleaner::new(&runner).cleanup(&config).await;
    assert!(report.is_clean());
    let calls = std::fs::read_to_string(&log).unwrap();
    assert_eq!(
        calls.lines().collect::<Vec<_>>(),
        vec!["rm -f chat-app", "ps -q --filter publish=5432", "stop abc123"]
    );
}
