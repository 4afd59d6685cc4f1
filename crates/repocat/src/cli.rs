//! Command-line argument parsing.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, Command, CommandFactory, FromArgMatches, Parser};
use once_cell::sync::Lazy;

use crate::domain::model::{Invocation, InvocationOptions};

static USAGE: Lazy<String> = Lazy::new(|| command().render_help().to_string());

const END_OF_OPTIONS: &str = "--";
const KNOWN_TOKENS: &[&str] = &["-c", "--copy", "-h", "--help", "--version"];

/// repocat – bundle every text file tracked by git into one blob
#[derive(Parser, Debug)]
#[command(
    name = "repocat",
    version,
    about = "Concatenate all text files tracked by git, printing them or copying them to the clipboard",
    long_about = None,
    after_help = "Each file is emitted as a '--- FILE: ./<path> ---' header, its verbatim contents, and two blank lines.",
    disable_version_flag = true,
    args_override_self = true
)]
struct Cli {
    /// Copy the bundle to the system clipboard instead of printing it
    #[arg(short = 'c', long = "copy")]
    copy: bool,
}

/// The derived command plus a long-only `--version` flag.
fn command() -> Command {
    Cli::command().arg(
        Arg::new("version")
            .long("version")
            .help("Print version information")
            .action(ArgAction::Version),
    )
}

/// Rejected command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// Interpret the arguments after the program name.
///
/// Help and version stop parsing where they appear; otherwise the first
/// unrecognized token is reported exactly as typed. A bare `--` is not an
/// end-of-options marker here, it is an unknown option like any other.
pub fn parse<I, T>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let terminator = args
        .iter()
        .position(|arg| arg.as_os_str() == END_OF_OPTIONS);
    let before = &args[..terminator.unwrap_or(args.len())];

    let argv = std::iter::once(OsString::from("repocat")).chain(before.iter().cloned());
    let parsed = command()
        .try_get_matches_from(argv)
        .and_then(|matches| Cli::from_arg_matches(&matches));

    match parsed {
        Ok(_) if terminator.is_some() => {
            Err(UsageError::UnknownOption(END_OF_OPTIONS.to_owned()))
        }
        Ok(cli) => Ok(Invocation::Run(InvocationOptions {
            copy_to_clipboard: cli.copy,
        })),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp => Ok(Invocation::Help),
            ErrorKind::DisplayVersion => Ok(Invocation::Version),
            _ => Err(UsageError::UnknownOption(offending_token(&err, before))),
        },
    }
}

/// Map clap's complaint back to the argument the user actually typed.
fn offending_token(err: &clap::Error, args: &[OsString]) -> String {
    let typed: Vec<String> = args
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let reported = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(token)) => Some(token.as_str()),
        _ => None,
    };

    reported
        .and_then(|token| typed.iter().find(|arg| typed_as(arg, token)).cloned())
        .or_else(|| {
            typed
                .iter()
                .find(|arg| !KNOWN_TOKENS.contains(&arg.as_str()))
                .cloned()
        })
        .or_else(|| reported.map(str::to_owned))
        .unwrap_or_else(|| err.kind().to_string())
}

/// Whether the raw argument `arg` is where clap's `token` came from:
/// the token itself, `--name=value`, or one letter of a short-flag cluster.
fn typed_as(arg: &str, token: &str) -> bool {
    if arg == token {
        return true;
    }
    if let Some(long) = token.strip_prefix("--") {
        return arg
            .strip_prefix("--")
            .and_then(|rest| rest.split_once('='))
            .is_some_and(|(name, _)| name == long);
    }
    match token.strip_prefix('-') {
        Some(short) if !short.is_empty() => {
            arg.len() > 2 && arg.starts_with('-') && !arg.starts_with("--") && arg[1..].contains(short)
        }
        _ => false,
    }
}

/// Usage text shown for `--help` and after usage errors.
pub fn usage() -> &'static str {
    &USAGE
}

/// Fixed string printed for `--version`.
pub fn version_line() -> String {
    format!("repocat {}", env!("CARGO_PKG_VERSION"))
}
