use std::io;
use std::process::ExitCode;

use repocat::app::pipeline::{Outcome, run_in_current_dir};
use repocat::cli;
use repocat::domain::model::Invocation;

fn main() -> ExitCode {
    repocat::init();

    let options = match cli::parse(std::env::args_os().skip(1)) {
        Ok(Invocation::Run(options)) => options,
        Ok(Invocation::Help) => {
            println!("{}", cli::usage().trim_end());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("{}", cli::version_line());
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            eprintln!("{}", cli::usage().trim_end());
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_in_current_dir(options, &mut out) {
        Ok(Outcome::Empty) => {
            eprintln!("Warning: No text files found in repository.");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Printed { .. }) => ExitCode::SUCCESS,
        Ok(Outcome::Copied { program, files }) => {
            eprintln!("Copied {files} file(s) to clipboard via {program}.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", anyhow::Error::from(err));
            ExitCode::FAILURE
        }
    }
}
