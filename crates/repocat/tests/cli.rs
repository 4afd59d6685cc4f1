use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use repocat::infra::tools::SearchPath;

fn repocat(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("repocat").expect("binary exists");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("REPOCAT_GIT")
        .env_remove("REPOCAT_FILE")
        .env_remove("REPOCAT_ON_CLASSIFY_ERROR")
        .env_remove("REPOCAT_LOG");
    cmd
}

#[test]
fn help_displays_usage() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--copy"));
}

#[test]
fn help_and_version_run_without_any_tools() {
    let temp = tempfile::tempdir().unwrap();
    for flag in ["-h", "--help", "--version"] {
        repocat(temp.path())
            .env("PATH", "")
            .arg(flag)
            .assert()
            .success()
            .stderr(predicate::str::is_empty());
    }
}

#[test]
fn version_prints_fixed_string() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "repocat {}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn unknown_option_fails_with_usage() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .arg("--bogus")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Unknown option: --bogus"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_option_wins_over_later_help() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .args(["-x", "--help"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error: Unknown option: -x"));
}

#[test]
fn positional_arguments_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .args(["--copy", "src"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Unknown option: src"));
}

#[test]
fn missing_git_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .env("PATH", "")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Error: git is not installed or not in PATH",
        ));
}

#[test]
fn configured_git_program_is_checked() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .env("REPOCAT_GIT", "repocat-missing-vcs")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "repocat-missing-vcs is not installed or not in PATH",
        ));
}

#[test]
fn repository_config_cannot_choose_tools() {
    let Some(sh) = SearchPath::from_env().resolve("sh") else {
        eprintln!("skipping: sh is required");
        return;
    };
    let temp = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(temp.path().join(".git")).unwrap();
    std::fs::create_dir_all(temp.path().join(".repocat")).unwrap();
    std::fs::write(
        temp.path().join(".repocat/config.toml"),
        format!(
            "[tools]\ngit = {path:?}\nfile = {path:?}\n",
            path = sh.display().to_string()
        ),
    )
    .unwrap();

    repocat(temp.path())
        .env("PATH", "")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: git is not installed or not in PATH",
        ));
}

#[cfg(unix)]
#[test]
fn relative_tool_paths_are_not_executed() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::tempdir().unwrap();
    let marker = temp.path().join("ran");
    let script = temp.path().join("tool.sh");
    std::fs::write(&script, format!("#!/bin/sh\ntouch '{}'\n", marker.display())).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    for (var, program) in [("REPOCAT_GIT", "./tool.sh"), ("REPOCAT_FILE", "./tool.sh")] {
        repocat(temp.path())
            .env(var, program)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty());
    }
    repocat(temp.path())
        .env("REPOCAT_GIT", "./tool.sh")
        .assert()
        .stderr(predicate::str::contains(
            "Error: ./tool.sh is not installed or not in PATH",
        ));
    assert!(!marker.exists(), "relative tool path was launched");
}

#[test]
fn double_dash_is_an_unknown_option() {
    let temp = tempfile::tempdir().unwrap();
    for args in [&["--"][..], &["--copy", "--"][..]] {
        repocat(temp.path())
            .args(args)
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Error: Unknown option: --\n"))
            .stderr(predicate::str::contains("Usage"));
    }
}

#[test]
fn rejected_token_is_echoed_as_typed() {
    let temp = tempfile::tempdir().unwrap();
    for token in ["-cx", "--copy=1"] {
        repocat(temp.path())
            .arg(token)
            .assert()
            .code(1)
            .stderr(predicate::str::contains(format!(
                "Error: Unknown option: {token}\n"
            )));
    }
}

#[test]
fn invalid_policy_override_is_a_config_error() {
    let temp = tempfile::tempdir().unwrap();
    repocat(temp.path())
        .env("REPOCAT_ON_CLASSIFY_ERROR", "retry")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: invalid configuration"));
}
