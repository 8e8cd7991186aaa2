//! Env file parsing and root/local reconciliation

use crate::{CoreError, Result};
use indexmap::IndexMap;
use std::path::Path;

/// Ordered `KEY=VALUE` map read from an env file.
///
/// Keys are unique. Iteration and [`EnvironmentMap::render`] follow insertion
/// order, so the output of [`merge`] is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    vars: IndexMap<String, String>,
}

impl EnvironmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse newline-delimited `KEY=VALUE` pairs.
    ///
    /// Blank lines and `#` comments are skipped, as are lines with no `=`.
    /// Only the first `=` splits, so values may contain `=`. A key repeated
    /// later in the text keeps its first position and takes the last value.
    pub fn parse(content: &str) -> Self {
        let mut vars = IndexMap::new();

        for line in content.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }

            vars.insert(key.to_string(), value.to_string());
        }

        Self { vars }
    }

    /// Read and parse an env file
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::env_file(path, e))?;
        Ok(Self::parse(&content))
    }

    /// Read an env file, treating a missing file as empty
    pub fn read_optional(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Env file {:?} not found, treating it as empty", path);
                Ok(Self::new())
            }
            Err(e) => Err(CoreError::env_file(path, e)),
        }
    }

    /// Write the rendered map to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.render()).map_err(|e| CoreError::env_file(path, e))
    }

    /// `KEY=VALUE` lines joined by `\n`
    pub fn render(&self) -> String {
        self.vars
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Reconcile a root env with a checkout's local env.
///
/// Every root key keeps root's value, even an empty one, over the local
/// value. Local-only keys pass through unchanged. Root keys come first in
/// root order, then local-only keys in local order. Neither input changes.
pub fn merge(root: &EnvironmentMap, local: &EnvironmentMap) -> EnvironmentMap {
    let mut merged = root.clone();
    for (key, value) in local.iter() {
        if !merged.contains_key(key) {
            merged.insert(key, value);
        }
    }
    merged
}

/// Merge `root_path` over `local_path` and write the result to `out_path`.
///
/// Missing source files count as empty. `out_path` must differ from both
/// sources; the sources are never written.
pub fn merge_files(root_path: &Path, local_path: &Path, out_path: &Path) -> Result<EnvironmentMap> {
    let root = EnvironmentMap::read_optional(root_path)?;
    let local = EnvironmentMap::read_optional(local_path)?;
    let merged = merge(&root, &local);
    merged.write(out_path)?;

    tracing::debug!(
        "Merged {} root and {} local variable(s) into {:?}",
        root.len(),
        local.len(),
        out_path
    );

    Ok(merged)
}
