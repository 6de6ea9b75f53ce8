//! End-to-end runs through the reelflow binary

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn reelflow(root: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_reelflow");
    Command::new(bin)
        .env_remove("REELFLOW_LOG")
        .env_remove("REELFLOW_LOG_OUTPUT")
        .arg("--config")
        .arg(root.join("project.yaml"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_init_run_resume_status() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let output = reelflow(root, &["init"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("✓ project.yaml"));
    assert!(root.join("contracts/artifact_contracts.yaml").is_file());

    let output = reelflow(root, &["run", "--date", "2026-02-10", "--slug", "cli"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("READY_FOR_CURATOR"));

    let run_dir = root.join("runs/2026-02/2026-02-10_cli");
    let run_dir_arg = run_dir.to_string_lossy().into_owned();
    std::fs::write(run_dir.join("curator_decision.md"), "Approved: yes\n").unwrap();

    let output = reelflow(root, &["resume", run_dir_arg.as_str()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("POST_BUNDLE_READY"));
    assert!(run_dir.join("post_bundle/post_plan.md").is_file());

    let output = reelflow(root, &["status", run_dir_arg.as_str(), "--format", "json"]);
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["state"], "POST_BUNDLE_READY");
    assert_eq!(status["gates"]["curator"]["decision"], "APPROVED");

    let output = reelflow(root, &["status", run_dir_arg.as_str()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("post_bundle/post_plan.md"));
}

#[test]
fn test_validate_exit_codes() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    assert!(reelflow(root, &["init"]).status.success());

    let good = root.join("good.md");
    std::fs::write(&good, "# Scripts\n\n## Script 1\nHOOK: hi\n").unwrap();
    let good_arg = good.to_string_lossy().into_owned();
    let output = reelflow(root, &["validate", "scripts", good_arg.as_str()]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("OK"));

    let bad = root.join("bad.md");
    std::fs::write(&bad, "# Scripts\n").unwrap();
    let bad_arg = bad.to_string_lossy().into_owned();
    let output = reelflow(root, &["validate", "scripts", bad_arg.as_str()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Missing required heading: ## Script 1"));
}

#[test]
fn test_missing_config_exits_with_error() {
    let temp = TempDir::new().unwrap();
    let output = reelflow(temp.path(), &["run"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("reelflow init"));
}

#[test]
fn test_qc_fail_exits_zero() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    assert!(reelflow(root, &["init"]).status.success());

    let output = Command::new(env!("CARGO_BIN_EXE_reelflow"))
        .env("REELFLOW_PROVIDER__STUB_QC_STATUS", "FAIL")
        .arg("--config")
        .arg(root.join("project.yaml"))
        .args(["run", "--date", "2026-02-11", "--slug", "qc"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("STOPPED_QC_FAIL"));
    assert!(root.join("runs/2026-02/2026-02-11_qc/STOPPED_QC_FAIL.md").is_file());
}
