use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn flowbridge(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("flowbridge").unwrap();
    cmd.current_dir(cwd);
    for v in &[
        "FLOWBRIDGE_VALIDATE",
        "FLOWBRIDGE_PRETTY",
        "FLOWBRIDGE_LOG_LEVEL",
        "FLOWBRIDGE_CONSOLE_OUTPUT",
        "RUST_LOG",
    ] {
        cmd.env_remove(v);
    }
    cmd
}

#[test]
fn test_validate_clean_workflow() {
    let temp = TempDir::new().unwrap();

    flowbridge(temp.path())
        .arg("validate")
        .arg(fixture("mermaid/complex.mmd"))
        .args(["--from", "mermaid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 error(s), 0 warning(s)"));
}

#[test]
fn test_validate_reports_errors_and_fails() {
    let temp = TempDir::new().unwrap();

    flowbridge(temp.path())
        .arg("validate")
        .arg(fixture("invalid/unreachable.json"))
        .args(["--from", "fs"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Error [WF-VAL-005] Following states are unreachable: Orphan",
        ))
        .stdout(predicate::str::contains("suggestion:"))
        .stderr(predicate::str::contains("failed validation with 1 error(s)"));
}

#[test]
fn test_validate_json_report() {
    let temp = TempDir::new().unwrap();

    let output = flowbridge(temp.path())
        .arg("validate")
        .arg(fixture("invalid/terminal_transition.json"))
        .args(["--from", "fs", "--format", "json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["format"], Value::String("freshservice".into()));
    assert_eq!(report["valid"], Value::Bool(false));
    assert_eq!(report["errors"], 1);
    assert_eq!(report["issues"][0]["code"], Value::String("WF-VAL-006".into()));
    assert_eq!(report["issues"][0]["location"], Value::String("Closed -> New".into()));
}

#[test]
fn test_validate_warnings_do_not_fail() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("draft.mmd");
    fs::write(&input, "stateDiagram-v2\n    [*] --> A\n    A --> B\n").unwrap();

    flowbridge(temp.path())
        .arg("validate")
        .arg(&input)
        .args(["--from", "mermaid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning [WF-VAL-008]"))
        .stdout(predicate::str::contains("0 error(s), 1 warning(s)"));
}

#[test]
fn test_validate_parse_error() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("broken.mmd");
    fs::write(&input, "stateDiagram-v2\n    A --> B --> C\n").unwrap();

    flowbridge(temp.path())
        .arg("validate")
        .arg(&input)
        .args(["--from", "mermaid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse"))
        .stderr(predicate::str::contains("Invalid transition line 2"));
}
