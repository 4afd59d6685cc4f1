//! MIME type classification through the `file` executable.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Reports the MIME type of a file.
pub trait MimeClassifier {
    fn mime_type(&self, path: &Path) -> Result<String>;
}

/// [`MimeClassifier`] running `file --brief --mime-type` from a fixed directory.
#[derive(Debug, Clone)]
pub struct FileCommand {
    program: String,
    workdir: PathBuf,
}

impl FileCommand {
    pub fn new(program: impl Into<String>, workdir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            workdir: workdir.into(),
        }
    }
}

impl MimeClassifier for FileCommand {
    fn mime_type(&self, path: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(["--brief", "--mime-type", "--"])
            .arg(path)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}
