//! Domain-specific errors.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions that stop a bundling run with exit status 1.
#[derive(Debug, Error)]
pub enum RepocatError {
    #[error("{program} is not installed or not in PATH")]
    MissingVcs { program: String },

    #[error("{program} is not installed or not in PATH (required to detect file types)")]
    MissingClassifier { program: String },

    #[error("not inside a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("failed to list tracked files: {0}")]
    Enumerate(String),

    #[error("failed to classify {}: {reason}", path.display())]
    Classify { path: PathBuf, reason: String },

    #[error("failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "no clipboard utility found; install xclip (X11) or wl-clipboard (Wayland), or print to stdout without --copy"
    )]
    NoClipboard,

    #[error("clipboard utility {program} failed: {reason}")]
    Clipboard { program: String, reason: String },

    #[error("failed to write bundle to stdout")]
    Stdout(#[source] std::io::Error),

    #[error("unable to determine working directory")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}
