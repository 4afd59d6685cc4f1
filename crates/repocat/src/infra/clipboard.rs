//! Clipboard integration through platform clipboard utilities.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, anyhow};

use crate::infra::tools::ToolLocator;

/// A destination that accepts the bundle on behalf of the system clipboard.
pub trait ClipboardSink {
    /// Program name shown in confirmations and errors.
    fn name(&self) -> &str;

    fn copy(&self, contents: &[u8]) -> Result<()>;
}

/// Pipes the contents into an external program's standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from an argv-style list; `None` when the list is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl ClipboardSink for CommandSink {
    fn name(&self) -> &str {
        &self.program
    }

    fn copy(&self, contents: &[u8]) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn clipboard command: {}", self.program))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(contents)
                .context("failed to write clipboard contents")?;
        }

        let status = child
            .wait()
            .with_context(|| format!("clipboard command did not exit cleanly: {}", self.program))?;
        if status.success() {
            Ok(())
        } else {
            Err(anyhow!("clipboard command exited with status {status}"))
        }
    }
}

/// One entry of the ordered clipboard probe list; the first passing probe wins.
pub struct ClipboardCandidate<'a> {
    label: &'static str,
    probe: Box<dyn Fn() -> bool + 'a>,
    sink: Box<dyn ClipboardSink + 'a>,
}

impl<'a> ClipboardCandidate<'a> {
    pub fn new(
        label: &'static str,
        probe: impl Fn() -> bool + 'a,
        sink: impl ClipboardSink + 'a,
    ) -> Self {
        Self {
            label,
            probe: Box::new(probe),
            sink: Box::new(sink),
        }
    }
}

/// Evaluate probes in order and hand back the first matching sink.
pub fn select_sink<'a>(candidates: Vec<ClipboardCandidate<'a>>) -> Option<Box<dyn ClipboardSink + 'a>> {
    for candidate in candidates {
        if (candidate.probe)() {
            tracing::debug!(backend = candidate.label, "clipboard backend selected");
            return Some(candidate.sink);
        }
        tracing::debug!(backend = candidate.label, "clipboard backend unavailable");
    }
    None
}

/// Probe order: user-configured command, macOS `pbcopy`, X11 `xclip`, Wayland `wl-copy`.
pub fn platform_candidates<'a>(
    os: &'a str,
    locator: &'a dyn ToolLocator,
    custom: Option<CommandSink>,
) -> Vec<ClipboardCandidate<'a>> {
    let mut candidates = Vec::new();

    if let Some(custom) = custom {
        let program = custom.program().to_owned();
        candidates.push(ClipboardCandidate::new(
            "configured",
            move || locator.is_available(&program),
            custom,
        ));
    }

    candidates.push(ClipboardCandidate::new(
        "macos",
        move || os == "macos",
        CommandSink::new("pbcopy", Vec::<String>::new()),
    ));
    candidates.push(ClipboardCandidate::new(
        "x11",
        move || locator.is_available("xclip"),
        CommandSink::new("xclip", ["-selection", "clipboard"]),
    ));
    candidates.push(ClipboardCandidate::new(
        "wayland",
        move || locator.is_available("wl-copy"),
        CommandSink::new("wl-copy", Vec::<String>::new()),
    ));

    candidates
}
