//! Installation phases and progress reporting

use std::fmt;
use tokio::sync::mpsc;

/// Where an installation currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    Fetching,
    CleaningUp,
    DetectingStructure,
    Deploying,
    Restoring,
    Done,
    Failed,
}

impl InstallPhase {
    /// `Done` and `Failed` end an installation
    pub fn is_terminal(&self) -> bool {
        matches!(self, InstallPhase::Done | InstallPhase::Failed)
    }
}

impl fmt::Display for InstallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InstallPhase::Fetching => "Fetching repository",
            InstallPhase::CleaningUp => "Cleaning up previous deployment",
            InstallPhase::DetectingStructure => "Detecting repository structure",
            InstallPhase::Deploying => "Deploying",
            InstallPhase::Restoring => "Restoring env files",
            InstallPhase::Done => "Done",
            InstallPhase::Failed => "Failed",
        };
        f.write_str(label)
    }
}

pub(crate) fn enter_phase(progress: Option<&mpsc::UnboundedSender<String>>, phase: InstallPhase) {
    match phase {
        InstallPhase::Failed => tracing::error!("{}", phase),
        _ => tracing::info!("{}", phase),
    }
    if phase.is_terminal() {
        send_progress(progress, &phase.to_string());
    } else {
        send_progress(progress, &format!("{}...", phase));
    }
}

pub(crate) fn send_progress(progress: Option<&mpsc::UnboundedSender<String>>, msg: &str) {
    if let Some(tx) = progress {
        let _ = tx.send(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages_for(phases: &[InstallPhase]) -> Vec<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for phase in phases {
            enter_phase(Some(&tx), *phase);
        }
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    #[test]
    fn test_running_phases_trail_off() {
        assert_eq!(
            messages_for(&[InstallPhase::Fetching, InstallPhase::Restoring]),
            vec!["Fetching repository...", "Restoring env files..."]
        );
    }

    #[test]
    fn test_terminal_phases_have_no_ellipsis() {
        assert_eq!(
            messages_for(&[InstallPhase::Done, InstallPhase::Failed]),
            vec!["Done", "Failed"]
        );
    }

    #[test]
    fn test_without_channel() {
        enter_phase(None, InstallPhase::Deploying);
        send_progress(None, "ignored");
    }
}
