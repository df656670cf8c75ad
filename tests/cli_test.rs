//! End-to-end tests for the auditor-bootstrap binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use auditor_bootstrap::requirements::CHROMIUM_GUIDANCE;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMPLETE_VARS: &str = r#"# Deployment settings
project_name = "lighthouse-auditor"
prod_project_id = "auditor-prod"
staging_project_id = "auditor-staging"
cicd_runner_project_id = "auditor-cicd"
region = "us-central1"
repository_name = "lighthouse-auditor"
"#;

/// A project directory plus an empty `bin` directory used as the whole PATH.
fn setup_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pyproject.toml"), "[project]\nname = \"app\"\n").unwrap();
    fs::create_dir_all(temp.path().join("bin")).unwrap();
    fs::create_dir_all(temp.path().join("home")).unwrap();
    temp
}

fn command(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("auditor-bootstrap"));
    cmd.current_dir(temp.path())
        .env("PATH", temp.path().join("bin"))
        .env("HOME", temp.path().join("home"))
        .env("NO_COLOR", "1")
        .env_remove("PROJECT_ID")
        .env_remove("RUST_LOG");
    cmd
}

#[cfg(unix)]
fn recording_tool(temp: &TempDir, name: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = temp.path().join("bin").join(name);
    fs::write(
        &path,
        format!("#!/bin/sh\necho \"{} $@\" >> \"$CALL_LOG\"\n", name),
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn call_log(temp: &TempDir) -> String {
    fs::read_to_string(temp.path().join("calls.log")).unwrap_or_default()
}

fn write_vars(root: &Path, text: &str) {
    let dir = root.join("deployment/terraform/vars");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("env.tfvars"), text).unwrap();
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("auditor-bootstrap"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("setup-dev-env"))
        .stdout(predicate::str::contains("check-deps"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("auditor-bootstrap"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_rejects_unknown_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("auditor-bootstrap"));
    cmd.arg("provision");
    cmd.assert().failure();
    Ok(())
}

#[cfg(unix)]
#[test]
fn setup_dev_env_without_project_id_runs_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    recording_tool(&temp, "terraform");

    command(&temp)
        .env("CALL_LOG", temp.path().join("calls.log"))
        .arg("setup-dev-env")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: PROJECT_ID environment variable is not set",
        ));

    assert!(call_log(&temp).is_empty());
    Ok(())
}

#[cfg(unix)]
#[test]
fn setup_dev_env_runs_terraform_init_then_apply() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    recording_tool(&temp, "terraform");
    fs::create_dir_all(temp.path().join("deployment/terraform/dev"))?;

    command(&temp)
        .env("CALL_LOG", temp.path().join("calls.log"))
        .env("PROJECT_ID", "auditor-dev")
        .arg("setup-dev-env")
        .assert()
        .success();

    assert_eq!(
        call_log(&temp),
        "terraform init\nterraform apply --var-file vars/env.tfvars --var dev_project_id=auditor-dev --auto-approve\n"
    );
    Ok(())
}

#[test]
fn check_deps_prints_chromium_guidance() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();

    command(&temp)
        .arg("check-deps")
        .assert()
        .failure()
        .stdout(predicate::str::contains(CHROMIUM_GUIDANCE));
    Ok(())
}

#[test]
fn status_without_tools_succeeds() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();

    command(&temp)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("gcloud"))
        .stdout(predicate::str::contains("chromium"));
    Ok(())
}

#[test]
fn tfvars_check_reports_placeholders() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    write_vars(
        temp.path(),
        &COMPLETE_VARS.replace("auditor-prod", "your-prod-project-id"),
    );

    command(&temp)
        .args(["tfvars", "check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("prod_project_id"));
    Ok(())
}

#[test]
fn tfvars_set_then_check_passes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    write_vars(
        temp.path(),
        &COMPLETE_VARS.replace("\"us-central1\"", "\"<region>\""),
    );

    command(&temp)
        .args(["tfvars", "set", "region=europe-west1", "connection_exists=false"])
        .assert()
        .success();

    let text = fs::read_to_string(temp.path().join("deployment/terraform/vars/env.tfvars"))?;
    assert!(text.starts_with("# Deployment settings\n"));
    assert!(text.contains("region = \"europe-west1\""));
    assert!(text.contains("connection_exists = false"));

    command(&temp).args(["tfvars", "check"]).assert().success();
    Ok(())
}

#[test]
fn tfvars_set_rejects_bad_assignment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();

    command(&temp)
        .args(["tfvars", "set", "region"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected KEY=VALUE"));
    Ok(())
}

#[test]
fn invalid_config_fails_before_running() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    let config_dir = temp.path().join(".auditor-bootstrap");
    fs::create_dir_all(&config_dir)?;
    fs::write(config_dir.join("config.yml"), "timeouts:\n  probe_secs: soon\n")?;

    command(&temp)
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}

#[test]
fn completions_need_no_project() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = Command::new(cargo_bin("auditor-bootstrap"));
    cmd.current_dir(temp.path()).args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("auditor-bootstrap"));
    Ok(())
}
