//! Example/working env file bookkeeping inside a checkout

use crate::{CoreError, Result};
use ignore::WalkBuilder;
use solctl_config::working_env_for;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Every file named `example_name` under `checkout`, sorted, skipping `.git`.
///
/// Hidden files are included and ignore files are not honoured: `.env.example`
/// is hidden and frequently listed in `.gitignore` patterns for `.env*`.
pub fn find_example_files(checkout: &Path, example_name: &OsStr) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkBuilder::new(checkout)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .filter_entry(|entry| entry.file_name() != OsStr::new(".git"))
        .build()
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| entry.file_name() == example_name)
        .map(|entry| entry.into_path())
        .collect();
    found.sort();
    found
}

/// Copy an example-env file over its working sibling
pub fn restore_env_file(example: &Path, working: &Path) -> Result<()> {
    copy_env_file(example, working)
}

/// Copy every example-env file under `checkout` over its working sibling.
/// Returns how many were reset.
pub fn reset_all_env_files(checkout: &Path, example_name: &OsStr) -> Result<usize> {
    let examples = find_example_files(checkout, example_name);
    for example in &examples {
        restore_env_file(example, &working_env_for(example))?;
    }
    tracing::debug!("Reset {} env file(s) under {:?}", examples.len(), checkout);
    Ok(examples.len())
}

pub(crate) fn copy_env_file(from: &Path, to: &Path) -> Result<()> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| CoreError::env_file(from, e))
}

/// Delete a merge side file; already gone is fine
pub(crate) fn remove_temp_file(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoreError::env_file(path, e)),
    }
}
