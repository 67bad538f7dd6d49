//! Argument parsing and exit codes of the binary.

use predicates::prelude::*;

use crate::pullrun;

#[test]
fn test_help_flag_lists_options_and_exits_zero() {
    pullrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--registry"))
        .stdout(predicate::str::contains("--repository"))
        .stdout(predicate::str::contains("--version"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_help_documents_env_overrides() {
    pullrun()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("INSTALL_MODE"))
        .stdout(predicate::str::contains("REPOSITORY"));
}

#[test]
fn test_invalid_mode_exits_one() {
    pullrun()
        .args(["--mode", "deploy"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("deploy"));
}

#[test]
fn test_invalid_mode_from_env_exits_one() {
    pullrun()
        .env("INSTALL_MODE", "sometimes")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("sometimes"));
}

#[test]
fn test_unknown_flag_exits_one() {
    pullrun().arg("--frobnicate").assert().code(1);
}

#[test]
fn test_version_without_value_is_an_error() {
    pullrun().arg("--version").assert().code(1);
}

#[test]
fn test_verbose_and_quiet_conflict() {
    pullrun().args(["--verbose", "--quiet"]).assert().code(1);
}

#[test]
fn test_invalid_config_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "colour: red\n").unwrap();

    pullrun()
        .env("PULLRUN_CONFIG", &path)
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_no_color_env_is_accepted_like_any_non_empty_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "colour: red\n").unwrap();

    for value in ["1", "true", "yes"] {
        pullrun()
            .env("NO_COLOR", value)
            .env("PULLRUN_CONFIG", &path)
            .args(["--mode", "install"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid value").not())
            .stderr(predicate::str::starts_with("Error: loading config"));
    }
}
