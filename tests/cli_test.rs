//! Integration tests for the fleetcheck binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".fleetcheck");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    temp
}

fn fleetcheck(project: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("fleetcheck"));
    cmd.current_dir(project.path())
        .env("HOME", project.path())
        .env("NO_COLOR", "1");
    cmd
}

const STRICT_CONFIG: &str = r#"
profile:
  min_clock_mhz: 1400
  tier_b_memory_gb: 4
settings:
  parallelism: 2
"#;

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("fleetcheck"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("readiness"))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("profile"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("fleetcheck"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_assess_help_lists_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("fleetcheck"));
    cmd.args(["assess", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--skip-diagnostic"))
        .stdout(predicate::str::contains("--targets-file"))
        .stdout(predicate::str::contains("--timeout"));
    Ok(())
}

#[test]
fn cli_profile_shows_merged_thresholds() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STRICT_CONFIG);
    let mut cmd = fleetcheck(&temp);
    cmd.arg("profile");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1400 MHz"))
        .stdout(predicate::str::contains("4 GB (Tier B)"));
    Ok(())
}

#[test]
fn cli_profile_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STRICT_CONFIG);
    let mut cmd = fleetcheck(&temp);
    cmd.args(["profile", "--json"]);
    let output = cmd.assert().success().get_output().stdout.clone();

    let value: serde_json::Value = serde_json::from_slice(&output)?;
    assert_eq!(value["profile"]["min_clock_mhz"], 1400);
    assert_eq!(value["parallelism"], 2);
    Ok(())
}

#[test]
fn cli_local_override_wins() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STRICT_CONFIG);
    fs::write(
        temp.path().join(".fleetcheck").join("config.local.yml"),
        "profile:\n  min_clock_mhz: 900\n",
    )?;
    let mut cmd = fleetcheck(&temp);
    cmd.arg("profile");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("900 MHz"));
    Ok(())
}

#[test]
fn cli_invalid_config_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("settings:\n  parallelism: 0\n");
    let mut cmd = fleetcheck(&temp);
    cmd.arg("profile");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("parallelism"));
    Ok(())
}

#[test]
fn cli_unparseable_config_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("profile: [unclosed\n");
    let mut cmd = fleetcheck(&temp);
    cmd.arg("assess");
    cmd.assert().code(2);
    Ok(())
}

#[test]
fn cli_missing_config_override_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let mut cmd = fleetcheck(&temp);
    cmd.args(["--config", "nowhere.yml", "profile"]);
    cmd.assert().code(2);
    Ok(())
}

#[test]
fn cli_missing_targets_file_exits_two() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STRICT_CONFIG);
    let mut cmd = fleetcheck(&temp);
    cmd.args(["assess", "--targets-file", "hosts.txt"]);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("hosts.txt"));
    Ok(())
}

#[test]
fn cli_assess_local_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(STRICT_CONFIG);
    let mut cmd = fleetcheck(&temp);
    cmd.args(["assess", "localhost", "--skip-diagnostic", "--json"]);
    let output = cmd.output()?;

    let code = output.status.code();
    assert!(code == Some(0) || code == Some(1), "exit code {:?}", code);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["total"], 1);
    assert_eq!(value["outcomes"][0]["target"], "localhost");
    assert_eq!(value["profile"]["min_clock_mhz"], 1400);
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("fleetcheck"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fleetcheck"));
    Ok(())
}

#[test]
fn cli_rejects_unknown_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("fleetcheck"));
    cmd.arg("deploy");
    cmd.assert().failure();
    Ok(())
}
