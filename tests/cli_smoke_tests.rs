mod common;

use assert_cmd::Command;
use predicates::prelude::*;

use common::{fixture_path, temp_dir};

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cascade_core_cli").expect("binary exists");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn tree_prints_branches_lines_and_areas() {
    cli()
        .arg("tree")
        .arg(fixture_path("areas.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Central (#1)"))
        .stdout(predicate::str::contains("Evening (#12)"))
        .stdout(predicate::str::contains("Mill Lane (#201), Quay (#202)"));
}

#[test]
fn missing_records_file_fails() {
    cli()
        .arg("tree")
        .arg(temp_dir().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn unknown_command_prints_usage() {
    cli()
        .arg("launch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage: cascade_core_cli"));
}

#[test]
fn forget_clears_remembered_selection() {
    let dir = temp_dir();
    let store = dir.join("session.json");
    std::fs::write(
        &store,
        r#"{"selected_branch_name": "Central", "selected_line_name": "Morning", "selected_area_id": "101"}"#,
    )
    .unwrap();

    cli()
        .arg("forget")
        .arg("--store")
        .arg(&store)
        .arg("--config")
        .arg(dir.join("config.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("cleared"));

    let remaining = std::fs::read_to_string(&store).unwrap();
    assert!(!remaining.contains("Central"));
}

#[test]
fn version_reports_package_version() {
    cli()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
