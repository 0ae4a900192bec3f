//! Exit codes and suggestions for failing invocations.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn template_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates/python-project")
}

/// `hatchery` isolated from the caller's config, `.env` and log settings.
fn hatchery(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hatchery").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("HATCHERY_TEMPLATES_DIR")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn invalid_year_exits_2_and_names_the_parameter() {
    let home = TempDir::new().unwrap();
    hatchery(&home)
        .arg("generate")
        .arg(template_dir())
        .args(["--no-input", "-o", "out", "--param", "copyright_year=20X5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("copyright_year"))
        .stderr(predicate::str::contains("Suggestions:"));

    assert!(!home.path().join("out/example-package").exists());
}

#[test]
fn invalid_choice_lists_the_allowed_values() {
    let home = TempDir::new().unwrap();
    hatchery(&home)
        .arg("generate")
        .arg(template_dir())
        .args(["--no-input", "--param", "project_flavor=django"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("project_flavor"))
        .stderr(predicate::str::contains("flask_app"));
}

#[test]
fn missing_template_exits_3() {
    let home = TempDir::new().unwrap();
    hatchery(&home)
        .args(["generate", "no/such/template", "--no-input"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Template not found"));
}

#[test]
fn param_without_equals_exits_2() {
    let home = TempDir::new().unwrap();
    hatchery(&home)
        .arg("generate")
        .arg(template_dir())
        .args(["--no-input", "--param", "project_flavor"])
        .assert()
        .code(2);
}

#[test]
fn missing_config_file_exits_4() {
    let home = TempDir::new().unwrap();
    hatchery(&home)
        .args(["-c", "absent.toml", "config"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn existing_project_exits_2_and_suggests_overwrite() {
    let home = TempDir::new().unwrap();
    let run = || {
        let mut cmd = hatchery(&home);
        cmd.arg("generate").arg(template_dir()).arg("--no-input");
        cmd
    };
    run().assert().success();

    run()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--overwrite-if-exists"));

    run().arg("--overwrite-if-exists").assert().success();
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    hatchery(&home).arg("frobnicate").assert().code(2);
}
