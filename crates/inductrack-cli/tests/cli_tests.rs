//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn inductrack() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("inductrack").unwrap()
}

#[test]
fn validate_warehouse_induction() {
    inductrack()
        .arg("validate")
        .arg("--inductions")
        .arg("../../inductions/warehouse-safety.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 questions"))
        .stdout(predicate::str::contains("All inductions valid"));
}

#[test]
fn validate_office_induction() {
    inductrack()
        .arg("validate")
        .arg("--inductions")
        .arg("../../inductions/office-orientation.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"));
}

#[test]
fn validate_directory() {
    inductrack()
        .arg("validate")
        .arg("--inductions")
        .arg("../../inductions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warehouse Safety"))
        .stdout(predicate::str::contains("Office Orientation"));
}

#[test]
fn validate_nonexistent_file() {
    inductrack()
        .arg("validate")
        .arg("--inductions")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_flags_authoring_mistakes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"
[induction]
id = "broken"
name = "Broken"

[[questions]]
id = "q1"
type = "multichoice"
question = "Pick"
options = ["a", "b"]
correct_options = [0, 9]
"#,
    )
    .unwrap();

    inductrack()
        .arg("validate")
        .arg("--inductions")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("out of range"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    inductrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created inductrack.toml"))
        .stdout(predicate::str::contains("Created inductions/example.toml"));

    assert!(dir.path().join("inductrack.toml").exists());
    assert!(dir.path().join("inductions/example.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    // First init
    inductrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Second init should skip
    inductrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn init_output_validates_cleanly() {
    let dir = TempDir::new().unwrap();

    inductrack()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    inductrack()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--inductions")
        .arg("inductions/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All inductions valid"));
}

#[test]
fn summary_text_output() {
    let dir = TempDir::new().unwrap();
    let roster_path = dir.path().join("roster.json");
    std::fs::write(&roster_path, make_test_roster()).unwrap();

    inductrack()
        .arg("summary")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--as-of")
        .arg("2024-01-15T00:00:00Z")
        .assert()
        .success()
        .stdout(predicate::str::contains("warehouse-safety"))
        .stdout(predicate::str::contains("50.0%"));
}

#[test]
fn summary_json_output() {
    let dir = TempDir::new().unwrap();
    let roster_path = dir.path().join("roster.json");
    std::fs::write(&roster_path, make_test_roster()).unwrap();

    inductrack()
        .arg("summary")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--as-of")
        .arg("2024-01-05T00:00:00Z")
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rollup\""))
        .stdout(predicate::str::contains("\"inProgress\": 1"));
}

#[test]
fn compare_reports_detects_lapse() {
    let dir = TempDir::new().unwrap();
    let roster_path = dir.path().join("roster.json");
    std::fs::write(&roster_path, make_test_roster()).unwrap();

    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");

    inductrack()
        .arg("summary")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--as-of")
        .arg("2024-01-05T00:00:00Z")
        .arg("--output")
        .arg(&baseline_path)
        .assert()
        .success();

    inductrack()
        .arg("summary")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--as-of")
        .arg("2024-01-15T00:00:00Z")
        .arg("--output")
        .arg(&current_path)
        .assert()
        .success();

    inductrack()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 lapses"));

    // --fail-on-lapse turns the lapse into a failing exit code
    inductrack()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline_path)
        .arg("--current")
        .arg(&current_path)
        .arg("--fail-on-lapse")
        .assert()
        .failure();
}

#[test]
fn compare_nonexistent_report() {
    inductrack()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn remind_dry_run_prints_reminders() {
    let dir = TempDir::new().unwrap();
    let roster_path = dir.path().join("roster.json");
    std::fs::write(&roster_path, make_test_roster()).unwrap();

    inductrack()
        .current_dir(dir.path())
        .arg("remind")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--as-of")
        .arg("2024-01-15T00:00:00Z")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("REMINDER"))
        .stderr(predicate::str::contains("Dispatch complete: 1/1 sent"));
}

#[test]
fn help_output() {
    inductrack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Induction assignment tracking and compliance tooling",
        ));
}

#[test]
fn version_output() {
    inductrack()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("inductrack"));
}

/// A minimal valid roster: one completed assignment and one still in
/// progress, both due 2024-01-10.
fn make_test_roster() -> String {
    r#"[
    {
        "id": "00000000-0000-0000-0000-000000000001",
        "userId": "00000000-0000-0000-0000-000000000011",
        "inductionId": "warehouse-safety",
        "status": "complete",
        "availableFrom": "2024-01-01T00:00:00Z",
        "dueDate": "2024-01-10T00:00:00Z",
        "assignedAt": "2023-12-20T00:00:00Z",
        "startedAt": "2024-01-02T00:00:00Z",
        "completedAt": "2024-01-03T00:00:00Z",
        "answers": {}
    },
    {
        "id": "00000000-0000-0000-0000-000000000002",
        "userId": "00000000-0000-0000-0000-000000000012",
        "inductionId": "warehouse-safety",
        "status": "in_progress",
        "availableFrom": "2024-01-01T00:00:00Z",
        "dueDate": "2024-01-10T00:00:00Z",
        "assignedAt": "2023-12-20T00:00:00Z",
        "startedAt": "2024-01-02T00:00:00Z",
        "completedAt": null,
        "answers": {}
    }
]"#
    .to_string()
}
