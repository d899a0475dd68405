//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quiztally(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quiztally").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("QUIZTALLY_DATA_DIR")
        .env_remove("QUIZTALLY_CATALOG")
        .env_remove("RUST_LOG");
    cmd
}

fn submit(dir: &Path, respondent: &str, group: &str, answers: &str) {
    quiztally(dir)
        .args(["submit", "--respondent", respondent, "--group", group])
        .args(["--answers", answers])
        .assert()
        .success();
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiz scoring"))
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiztally"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quiztally(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quiztally.toml"))
        .stdout(predicate::str::contains("Created catalog.toml"));

    assert!(dir.path().join("quiztally.toml").exists());
    assert!(dir.path().join("catalog.toml").exists());

    quiztally(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));

    quiztally(dir.path())
        .args(["validate", "--catalog", "catalog.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AIDS Awareness (6 questions)"))
        .stdout(predicate::str::contains("Catalog valid."));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["validate", "--catalog", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn questions_lists_builtin_catalog() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Q1. HIV is the virus that causes AIDS."))
        .stdout(predicate::str::contains("Q6."));
}

#[test]
fn submit_prints_score_and_feedback() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["submit", "--respondent", "s1", "--group", "7A"])
        .args(["--answers", "t,f,t,t,f,t"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You scored 5/6!"))
        .stdout(predicate::str::contains("Q6 [incorrect]"))
        .stdout(predicate::str::contains("Q1 [correct]"));

    assert!(dir
        .path()
        .join("quiztally-data")
        .join("quizResults.json")
        .exists());
}

#[test]
fn submit_rejects_incomplete_sheet() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["submit", "--respondent", "s1", "--group", "7A"])
        .args(["--answers", "t,f,-,t,f,f"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 3 has no answer"));

    // Nothing was stored.
    quiztally(dir.path())
        .arg("groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("No results yet."));
}

#[test]
fn submit_partial_when_allowed() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["submit", "--respondent", "s1", "--group", "7A"])
        .args(["--answers", "t,f,-,t,f,f", "--allow-partial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You scored 5/6!"));
}

#[test]
fn submit_rejects_wrong_answer_count() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["submit", "--respondent", "s1", "--group", "7A"])
        .args(["--answers", "t,f", "--allow-partial"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected 6 answers, got 2"));
}

#[test]
fn stats_with_group_filter() {
    let dir = TempDir::new().unwrap();
    submit(dir.path(), "s1", "7A", "t,f,t,t,f,f");
    submit(dir.path(), "s2", "7A", "f,t,f,f,t,t");
    submit(dir.path(), "s3", "7B", "t,f,t,f,f,f");

    let out = quiztally(dir.path())
        .args(["stats", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["count"], 3);
    assert_eq!(summary["highest"], 6);
    assert_eq!(summary["lowest"], 0);

    let out = quiztally(dir.path())
        .args(["stats", "--group", "7B", "--format", "json"])
        .output()
        .unwrap();
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["average"], 5.0);

    quiztally(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Respondents"));

    quiztally(dir.path())
        .arg("groups")
        .assert()
        .success()
        .stdout(predicate::str::contains("all"))
        .stdout(predicate::str::contains("7A"))
        .stdout(predicate::str::contains("7B"));
}

#[test]
fn stats_rejects_empty_group() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["stats", "--group", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("group filter cannot be empty"));
}

#[test]
fn resubmission_replaces_result() {
    let dir = TempDir::new().unwrap();
    submit(dir.path(), "s1", "7A", "f,t,f,f,t,t");
    submit(dir.path(), "s1", "7A", "t,f,t,t,f,f");

    let out = quiztally(dir.path())
        .args(["stats", "--format", "json"])
        .output()
        .unwrap();
    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["count"], 1);
    assert_eq!(summary["lowest"], 6);
}

#[test]
fn analyze_reports_weak_topics() {
    let dir = TempDir::new().unwrap();
    submit(dir.path(), "s1", "7A", "t,t,t,t,f,f");
    submit(dir.path(), "s2", "7A", "t,t,t,t,f,f");

    quiztally(dir.path())
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("Need more practice on:"))
        .stdout(predicate::str::contains(
            "Question 2 (0.0% correct) - HIV vaccine availability",
        ))
        .stdout(predicate::str::contains("Q2: 2 incorrect (100%)"));

    let out = quiztally(dir.path())
        .args(["analyze", "--format", "json"])
        .output()
        .unwrap();
    let snapshot: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(snapshot["weak_topics"]["status"], "needs_practice");
    assert_eq!(snapshot["per_question_correct_rate"][1], 0);
    assert_eq!(snapshot["per_group_average"]["7A"], 5.0);
}

#[test]
fn analyze_without_data() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("No test data yet."));
}

#[test]
fn export_xlsx_and_html() {
    let dir = TempDir::new().unwrap();
    submit(dir.path(), "s1", "7A", "t,f,t,t,f,f");

    quiztally(dir.path())
        .args(["export", "--format", "all", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data exported successfully!"));

    let files: Vec<String> = std::fs::read_dir(dir.path().join("out"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(files
        .iter()
        .any(|f| f.starts_with("Quiz_All_Groups_") && f.ends_with(".xlsx")));
    assert!(files.iter().any(|f| f.ends_with(".html")));
    assert!(files.iter().any(|f| f.ends_with(".json")));
}

#[test]
fn export_without_data_fails() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no data to export"));
}

#[test]
fn chart_writes_svg() {
    let dir = TempDir::new().unwrap();
    submit(dir.path(), "s1", "7A", "t,f,t,t,f,t");

    quiztally(dir.path())
        .args(["chart", "--kind", "error-distribution"])
        .assert()
        .success();

    let svg = std::fs::read_to_string(
        dir.path()
            .join("quiztally-exports")
            .join("incorrect_answers_distribution.svg"),
    )
    .unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Q6: 1 incorrect (100%)"));
}

#[test]
fn chart_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    quiztally(dir.path())
        .args(["chart", "--kind", "radar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown chart kind"));
}
