//! Environment checks performed before any repository work.

use std::path::Path;

use crate::domain::errors::RepocatError;
use crate::infra::git::VersionControl;
use crate::infra::tools::ToolLocator;

/// Names of the executables the pipeline depends on.
#[derive(Debug, Clone, Copy)]
pub struct RequiredTools<'a> {
    pub vcs: &'a str,
    pub classifier: &'a str,
}

/// Check, in order: the version-control tool, the classifier, then that
/// `workdir` is inside a working tree. Stops at the first failure.
pub fn validate_environment(
    tools: RequiredTools<'_>,
    locator: &dyn ToolLocator,
    vcs: &dyn VersionControl,
    workdir: &Path,
) -> Result<(), RepocatError> {
    if !locator.is_available(tools.vcs) {
        return Err(RepocatError::MissingVcs {
            program: tools.vcs.to_owned(),
        });
    }

    if !locator.is_available(tools.classifier) {
        return Err(RepocatError::MissingClassifier {
            program: tools.classifier.to_owned(),
        });
    }

    let inside = vcs.is_inside_work_tree(workdir).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "work tree query failed");
        false
    });
    if !inside {
        return Err(RepocatError::NotARepository(workdir.to_path_buf()));
    }

    Ok(())
}
