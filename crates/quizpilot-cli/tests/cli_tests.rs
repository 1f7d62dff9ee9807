//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizpilot() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizpilot").unwrap()
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizpilot()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizpilot.toml"));

    assert!(dir.path().join("quizpilot.toml").exists());
}

#[test]
fn init_skips_existing_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("quizpilot.toml"), "quiz_url = \"x\"\n").unwrap();

    quizpilot()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    let content = std::fs::read_to_string(dir.path().join("quizpilot.toml")).unwrap();
    assert_eq!(content, "quiz_url = \"x\"\n");
}

#[test]
fn stats_on_missing_ledger_reports_empty() {
    let dir = TempDir::new().unwrap();

    quizpilot()
        .current_dir(dir.path())
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"questions\": 0"));
}

#[test]
fn stats_summarizes_ledger() {
    let dir = TempDir::new().unwrap();
    let ledger = dir.path().join("quiz_results.csv");
    std::fs::write(
        &ledger,
        "Question,Option 1,Option 2,Option 3\n\
         Q1,A (Correct),B (Incorrect),C\n\
         Q2,X (Incorrect),Y,Z\n",
    )
    .unwrap();

    quizpilot()
        .current_dir(dir.path())
        .args(["stats", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"questions\": 2"))
        .stdout(predicate::str::contains("\"resolved\": 1"))
        .stdout(predicate::str::contains("\"probing\": 1"));
}

#[test]
fn stats_table_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("quiz_results.csv"),
        "Question,Option 1,Option 2\nQ1,A (Correct),B\n",
    )
    .unwrap();

    quizpilot()
        .current_dir(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Questions known"))
        .stdout(predicate::str::contains("Resolved"));
}

#[test]
fn stats_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();

    quizpilot()
        .current_dir(dir.path())
        .args(["stats", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn stats_surfaces_malformed_ledger() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("quiz_results.csv"),
        "Question,Option 1\nQ1,A,B,C\n",
    )
    .unwrap();

    quizpilot()
        .current_dir(dir.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed ledger row"));
}

#[test]
fn run_requires_a_quiz_url() {
    let dir = TempDir::new().unwrap();

    quizpilot()
        .current_dir(dir.path())
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no quiz URL configured"));
}

#[test]
fn run_rejects_missing_config_path() {
    let dir = TempDir::new().unwrap();

    quizpilot()
        .current_dir(dir.path())
        .args(["run", "--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}
