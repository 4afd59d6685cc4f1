//! Git integration through the `git` executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Version-control queries needed to enumerate a working tree.
pub trait VersionControl {
    /// Whether `dir` lies inside a working tree.
    fn is_inside_work_tree(&self, dir: &Path) -> Result<bool>;

    /// Tracked paths relative to `dir`, in the order the tool reports them.
    fn tracked_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// [`VersionControl`] backed by the git command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl VersionControl for GitCli {
    fn is_inside_work_tree(&self, dir: &Path) -> Result<bool> {
        let output = Command::new(&self.program)
            .args(["rev-parse", "--is-inside-work-tree"])
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {} rev-parse", self.program))?;

        let inside = output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true";
        tracing::debug!(dir = %dir.display(), inside, "work tree check");
        Ok(inside)
    }

    fn tracked_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let output = Command::new(&self.program)
            .args(["ls-files", "-z"])
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {} ls-files", self.program))?;

        if !output.status.success() {
            bail!(
                "{} ls-files exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let files = parse_nul_delimited(&output.stdout);
        tracing::debug!(count = files.len(), "listed tracked files");
        Ok(files)
    }
}

/// Split NUL-terminated tool output into paths, keeping every byte of each name.
pub fn parse_nul_delimited(bytes: &[u8]) -> Vec<PathBuf> {
    bytes
        .split(|byte| *byte == 0)
        .filter(|entry| !entry.is_empty())
        .map(path_from_bytes)
        .collect()
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
