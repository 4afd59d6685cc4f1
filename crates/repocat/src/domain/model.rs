//! Domain models for invocations, MIME filtering, and bundles.

use std::path::{Path, PathBuf};

/// Substrings that mark a MIME type as text-like.
pub const DEFAULT_MIME_PATTERNS: &[&str] = &["text/", "json", "xml", "javascript", "x-sh", "x-ruby"];

const HEADER_PREFIX: &[u8] = b"--- FILE: ./";
const HEADER_SUFFIX: &[u8] = b" ---\n";
const BLOCK_SEPARATOR: &[u8] = b"\n\n";

/// Options collected from the command line for a bundling run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationOptions {
    pub copy_to_clipboard: bool,
}

/// What the command line asked the program to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    Run(InvocationOptions),
    Help,
    Version,
}

/// Coarse text detection based on substrings of the reported MIME type.
///
/// This is a heuristic: `application/vnd.something+xml` passes even when the
/// payload is binary, and text types registered under other names are missed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeFilter {
    patterns: Vec<String>,
}

impl MimeFilter {
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a file with this MIME type belongs in the bundle.
    pub fn accepts(&self, mime: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| mime.contains(pattern.as_str()))
    }
}

impl Default for MimeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIME_PATTERNS.iter().copied())
    }
}

/// Append-only buffer of file blocks, materialized fully before dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    bytes: Vec<u8>,
    files: Vec<PathBuf>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one block: header line, verbatim content, then the separator.
    pub fn push_file(&mut self, path: &Path, content: &[u8]) {
        self.bytes.extend_from_slice(HEADER_PREFIX);
        self.bytes.extend_from_slice(&path_bytes(path));
        self.bytes.extend_from_slice(HEADER_SUFFIX);
        self.bytes.extend_from_slice(content);
        self.bytes.extend_from_slice(BLOCK_SEPARATOR);
        self.files.push(path.to_path_buf());
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Relative paths of the included files, in bundle order.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> Vec<u8> {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().to_vec()
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> Vec<u8> {
    path.to_string_lossy().replace('\\', "/").into_bytes()
}
