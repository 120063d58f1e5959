//! Integration tests for the liftvault binary.
//!
//! These tests verify end-to-end behavior including:
//! - Session start/log/finish workflow against a scratch database
//! - Discard confirmation
//! - Routine activation and next-workout derivation
//! - History export

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary, pointed at a data dir
fn cli(data_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftvault"));
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("liftvault"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local workout session tracker"));
}

#[test]
fn test_status_idle_by_default() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));
}

#[test]
fn test_seeded_content_is_listed() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("workouts")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("Leg Day"));

    cli(&data_dir)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_start_explicit_workout() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Push Day")
        .assert()
        .success()
        .stdout(predicate::str::contains("Started 'Push Day'"));

    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Active session: Push Day"))
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_start_while_active_refuses() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Push Day")
        .assert()
        .success();

    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Pull Day")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already active"));

    // The original session survives
    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));
}

#[test]
fn test_start_without_routine_requires_explicit_workout() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active routine"));
}

#[test]
fn test_log_and_finish_workflow() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Push Day")
        .assert()
        .success();

    cli(&data_dir)
        .args(["set", "Bench Press", "1", "--weight", "80", "--done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Bench Press set 1"));

    cli(&data_dir)
        .args(["set", "Overhead Press", "1", "--skip"])
        .assert()
        .success();

    cli(&data_dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 sets recorded"));

    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active session"));

    cli(&data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("2 sets"));
}

#[test]
fn test_drafts_survive_between_invocations() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Pull Day")
        .assert()
        .success();

    cli(&data_dir)
        .args(["set", "Barbell Row", "2", "--weight", "60", "--reps", "9"])
        .assert()
        .success();

    // Every invocation is a fresh process; the draft must come back
    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("60 x 9"));
}

#[test]
fn test_swap_exercise() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Push Day")
        .assert()
        .success();

    cli(&data_dir)
        .args(["swap", "Bench Press", "Pull-up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Swapped Bench Press for Pull-up"));

    cli(&data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull-up"))
        .stdout(predicate::str::contains("swapped"));
}

#[test]
fn test_discard_requires_confirmation() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Leg Day")
        .assert()
        .success();

    cli(&data_dir)
        .arg("discard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    cli(&data_dir)
        .args(["discard", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session discarded"));

    cli(&data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No logged sessions"));
}

#[test]
fn test_routine_activation_drives_next() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("next")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no active routine"));

    cli(&data_dir)
        .args(["routines", "use", "Push Pull Legs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active routine: Push Pull Legs"));

    // Fresh routine, cycle 0: first workout in the queue
    cli(&data_dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"));

    cli(&data_dir)
        .args(["routines", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* "));
}

#[test]
fn test_finish_advances_active_routine() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .args(["routines", "use", "Push Pull Legs"])
        .assert()
        .success();

    cli(&data_dir).arg("start").assert().success();
    cli(&data_dir)
        .args(["set", "Bench Press", "1", "--done"])
        .assert()
        .success();
    cli(&data_dir)
        .arg("finish")
        .assert()
        .success()
        .stdout(predicate::str::contains("Routine cycle advanced"));

    // Cycle 1 of 3 mapped workouts: second in the queue
    cli(&data_dir)
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pull Day"));
}

#[test]
fn test_settings_unit_switch_persists() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit system: KG"));

    cli(&data_dir)
        .args(["settings", "--unit", "lbs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit system: LBS"));

    cli(&data_dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit system: LBS"));
}

#[test]
fn test_export_writes_csv() {
    let data_dir = setup_test_dir();
    cli(&data_dir)
        .arg("start")
        .arg("--workout")
        .arg("Push Day")
        .assert()
        .success();
    cli(&data_dir)
        .args(["set", "Bench Press", "1", "--weight", "100", "--done"])
        .assert()
        .success();
    cli(&data_dir).arg("finish").assert().success();

    let csv_path = data_dir.path().join("history.csv");
    cli(&data_dir)
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 sets"));

    let contents = std::fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("Bench Press"));
    assert!(contents.contains("100"));
}
