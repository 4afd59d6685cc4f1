//! End-to-end bundling run: validate, enumerate, bundle, deliver.

use std::env;
use std::io::Write;
use std::path::Path;

use crate::app::bundle::Bundler;
use crate::app::preflight::{RequiredTools, validate_environment};
use crate::app::sink::{Delivery, deliver};
use crate::domain::errors::RepocatError;
use crate::domain::model::InvocationOptions;
use crate::infra::clipboard::{ClipboardCandidate, CommandSink, platform_candidates};
use crate::infra::config::Config;
use crate::infra::git::{GitCli, VersionControl};
use crate::infra::mime::{FileCommand, MimeClassifier};
use crate::infra::tools::{SearchPath, ToolLocator};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No tracked file classified as text; nothing was written.
    Empty,
    Printed { files: usize },
    Copied { program: String, files: usize },
}

/// One bundling run over injected collaborators.
pub struct Pipeline<'a> {
    workdir: &'a Path,
    config: &'a Config,
    locator: &'a dyn ToolLocator,
    vcs: &'a dyn VersionControl,
    classifier: &'a dyn MimeClassifier,
    os: &'a str,
    clipboards: Option<Vec<ClipboardCandidate<'a>>>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        workdir: &'a Path,
        config: &'a Config,
        locator: &'a dyn ToolLocator,
        vcs: &'a dyn VersionControl,
        classifier: &'a dyn MimeClassifier,
    ) -> Self {
        Self {
            workdir,
            config,
            locator,
            vcs,
            classifier,
            os: env::consts::OS,
            clipboards: None,
        }
    }

    /// Override the operating system used for clipboard probing.
    pub fn with_os(mut self, os: &'a str) -> Self {
        self.os = os;
        self
    }

    /// Replace the platform clipboard probes.
    pub fn with_clipboards(mut self, candidates: Vec<ClipboardCandidate<'a>>) -> Self {
        self.clipboards = Some(candidates);
        self
    }

    pub fn run(self, options: InvocationOptions, out: &mut dyn Write) -> Result<Outcome, RepocatError> {
        let tools = RequiredTools {
            vcs: self.config.tools.git(),
            classifier: self.config.tools.file(),
        };
        validate_environment(tools, self.locator, self.vcs, self.workdir)?;

        let files = self
            .vcs
            .tracked_files(self.workdir)
            .map_err(|err| RepocatError::Enumerate(format!("{err:#}")))?;

        let filter = self.config.filter.mime_filter();
        let bundle = Bundler::new(self.workdir, self.classifier, &filter)
            .with_failure_policy(self.config.behavior.on_classify_error())
            .build(&files)?;

        if bundle.is_empty() {
            return Ok(Outcome::Empty);
        }

        let clipboards = match self.clipboards {
            Some(candidates) => candidates,
            None => {
                let custom = self
                    .config
                    .clipboard
                    .command
                    .as_deref()
                    .and_then(CommandSink::from_argv);
                platform_candidates(self.os, self.locator, custom)
            }
        };

        let files = bundle.file_count();
        Ok(match deliver(&bundle, options, clipboards, out)? {
            Delivery::Stdout => Outcome::Printed { files },
            Delivery::Clipboard { program } => Outcome::Copied { program, files },
        })
    }
}

/// Run against the real environment: current directory, `PATH`, git, and file.
pub fn run_in_current_dir(options: InvocationOptions, out: &mut dyn Write) -> Result<Outcome, RepocatError> {
    let workdir = env::current_dir().map_err(RepocatError::WorkingDirectory)?;
    let config = Config::load().map_err(|err| RepocatError::Config(format!("{err:#}")))?;

    let locator = SearchPath::from_env();
    let vcs = GitCli::new(config.tools.git());
    let classifier = FileCommand::new(config.tools.file(), &workdir);

    Pipeline::new(&workdir, &config, &locator, &vcs, &classifier).run(options, out)
}
