//! Executable discovery on the search path.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Answers whether an external program can be launched.
pub trait ToolLocator {
    fn is_available(&self, program: &str) -> bool;
}

/// Looks programs up in a list of directories, like a shell resolving `PATH`.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Snapshot the process `PATH`.
    pub fn from_env() -> Self {
        Self::from_path_var(env::var_os("PATH"))
    }

    fn from_path_var(value: Option<OsString>) -> Self {
        let dirs = value
            .map(|raw| env::split_paths(&raw).collect())
            .unwrap_or_default();
        Self { dirs }
    }

    /// Full path the program resolves to, if any.
    ///
    /// Bare names go through the search dirs. Paths are only honoured when
    /// absolute; a relative path would resolve inside whatever repository
    /// the process happens to be running in.
    pub fn resolve(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.is_absolute() {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }
        if candidate.components().count() > 1 {
            tracing::warn!(program, "ignoring relative tool path");
            return None;
        }

        self.dirs
            .iter()
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
            .find(|path| is_executable(path))
    }
}

impl ToolLocator for SearchPath {
    fn is_available(&self, program: &str) -> bool {
        let found = self.resolve(program);
        tracing::debug!(program, resolved = ?found, "tool lookup");
        found.is_some()
    }
}

#[cfg(windows)]
fn executable_names(program: &str) -> impl Iterator<Item = String> + '_ {
    [String::new(), ".exe".into(), ".cmd".into(), ".bat".into()]
        .into_iter()
        .map(move |ext| format!("{program}{ext}"))
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(program.to_owned())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
