//! Classification and bundling of tracked files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::RepocatError;
use crate::domain::model::{Bundle, MimeFilter};
use crate::infra::config::FailurePolicy;
use crate::infra::mime::MimeClassifier;

/// Builds a [`Bundle`] from tracked paths, one classifier query per file.
pub struct Bundler<'a> {
    workdir: &'a Path,
    classifier: &'a dyn MimeClassifier,
    filter: &'a MimeFilter,
    on_failure: FailurePolicy,
}

impl<'a> Bundler<'a> {
    pub fn new(workdir: &'a Path, classifier: &'a dyn MimeClassifier, filter: &'a MimeFilter) -> Self {
        Self {
            workdir,
            classifier,
            filter,
            on_failure: FailurePolicy::Abort,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Classify every path in order and append the text-like ones.
    pub fn build(&self, files: &[PathBuf]) -> Result<Bundle, RepocatError> {
        let mut bundle = Bundle::new();

        for path in files {
            match self.include(path) {
                Ok(Some(content)) => bundle.push_file(path, &content),
                Ok(None) => {}
                Err(err) if self.on_failure == FailurePolicy::Skip => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping file");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            tracked = files.len(),
            included = bundle.file_count(),
            "bundle built"
        );
        Ok(bundle)
    }

    fn include(&self, path: &Path) -> Result<Option<Vec<u8>>, RepocatError> {
        let mime = self
            .classifier
            .mime_type(path)
            .map_err(|err| RepocatError::Classify {
                path: path.to_path_buf(),
                reason: format!("{err:#}"),
            })?;

        if !self.filter.accepts(&mime) {
            tracing::debug!(path = %path.display(), %mime, "excluded");
            return Ok(None);
        }

        tracing::debug!(path = %path.display(), %mime, "included");
        let content = fs::read(self.workdir.join(path)).map_err(|source| RepocatError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(content))
    }
}
