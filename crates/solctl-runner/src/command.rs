//! Shell command lines

use std::fmt;
use std::path::{Path, PathBuf};

/// A command line handed to a shell, plus the directory it runs in.
///
/// Arguments added with [`ShellCommand::arg`] are quoted, so paths, URLs and
/// image tags with spaces or metacharacters reach the program unchanged.
/// [`ShellCommand::script`] takes a raw line for `&&` chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    line: String,
    current_dir: Option<PathBuf>,
}

impl ShellCommand {
    /// Start a command line with a program name
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            line: shell_words::quote(program.as_ref()).into_owned(),
            current_dir: None,
        }
    }

    /// Use a raw shell line as-is
    pub fn script(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            current_dir: None,
        }
    }

    /// Append one quoted argument
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.line.push(' ');
        self.line.push_str(&shell_words::quote(arg.as_ref()));
        self
    }

    /// Append several quoted arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    /// Append a path argument
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    /// Run in `dir` instead of the caller's working directory
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// The full command line
    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
