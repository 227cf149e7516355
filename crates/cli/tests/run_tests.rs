// Integration tests for `deckdiff run`, `validate`, `categories`, `init`.
// Run with: cargo test -p deckdiff-cli --test run_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const EXPORT: &str = r#"{
  "lists": [
    {"id": "L1", "name": "Inbox"},
    {"id": "L2", "name": "Done"}
  ],
  "cards": [
    {"id": "C1", "idList": "L1", "name": "w1", "desc": "d1", "closed": false},
    {"id": "C2", "idList": "L1", "name": "w2", "desc": "d2", "closed": true},
    {"id": "C3", "idList": "L2", "name": "w3", "desc": "d3", "closed": false}
  ]
}"#;

const CONFIG: &str = r#"
[files]
input_location = "input/"
input_name = "board"
master_location = "store/"
master_name = "master"
category_name = "Inbox"
output_location = "output/"
"#;

fn deckdiff(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deckdiff"));
    cmd.current_dir(dir);
    cmd.env_remove("DECKDIFF_CONFIG");
    cmd.env("RUST_LOG", "warn");
    cmd
}

/// Workspace with a config file and the export in place.
fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("input")).unwrap();
    std::fs::write(dir.path().join("input/board.json"), EXPORT).unwrap();
    std::fs::write(dir.path().join("deckdiff.toml"), CONFIG).unwrap();
    dir
}

fn run_json(dir: &Path, extra: &[&str]) -> (Output, serde_json::Value) {
    let output = deckdiff(dir)
        .args(["run", "--json"])
        .args(extra)
        .output()
        .expect("deckdiff run --json");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {stdout}"));
    (output, value)
}

fn csv_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    files.sort();
    files
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

#[test]
fn run_writes_artifact_and_master() {
    let dir = workspace();
    let (output, report) = run_json(dir.path(), &[]);

    assert!(output.status.success(), "exit code was {:?}", output.status);
    assert_eq!(report["category"], "Inbox");
    assert_eq!(report["extracted"], 1);
    assert_eq!(report["new_items"], 1);
    assert_eq!(report["new_ids"], serde_json::json!(["C1"]));
    assert_eq!(report["master_after"], 1);

    // Reported relative to the config directory, which is the working directory here
    let artifact = dir.path().join(report["artifact"].as_str().unwrap());
    let file_name = artifact.file_name().unwrap().to_str().unwrap().to_string();
    assert_eq!(file_name.len(), "MMDDYYYYHHMMSS".len() + "Inbox.csv".len());
    assert!(file_name.ends_with("Inbox.csv"));
    assert!(file_name[..14].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(std::fs::read_to_string(&artifact).unwrap(), "w1,d1\n");

    let master: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("store/master.json")).unwrap())
            .unwrap();
    assert_eq!(master, serde_json::json!({"name": {"C1": "w1"}, "desc": {"C1": "d1"}}));
}

#[test]
fn second_run_reports_nothing_new() {
    let dir = workspace();
    let (first, _) = run_json(dir.path(), &[]);
    assert!(first.status.success());

    // Artifact names have one-second resolution
    std::thread::sleep(std::time::Duration::from_millis(1100));
    let (second, report) = run_json(dir.path(), &[]);

    assert!(second.status.success());
    assert_eq!(report["new_items"], 0);
    assert_eq!(report["master_before"], 1);
    let artifacts = csv_files(&dir.path().join("output"));
    assert_eq!(artifacts.len(), 2);
    assert_eq!(std::fs::read_to_string(&artifacts[1]).unwrap(), "");
}

#[test]
fn flags_override_config() {
    let dir = workspace();
    let (output, report) = run_json(dir.path(), &["--category", "Done", "--master-name", "done"]);

    assert!(output.status.success());
    assert_eq!(report["new_ids"], serde_json::json!(["C3"]));
    assert!(dir.path().join("store/done.json").exists());
    assert!(!dir.path().join("store/master.json").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = workspace();
    let (output, report) = run_json(dir.path(), &["--dry-run"]);

    assert!(output.status.success());
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["new_items"], 1);
    assert!(report.get("artifact").is_none());
    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join("store").exists());
}

#[test]
fn unknown_category_exits_5_with_hint() {
    let dir = workspace();
    let (output, report) = run_json(dir.path(), &["--category", "Backlog"]);

    assert_eq!(output.status.code(), Some(5));
    assert_eq!(report["error"], "category_not_found");
    assert_eq!(report["stage"], "extract");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("deckdiff categories"), "stderr: {stderr}");
}

#[test]
fn missing_export_exits_3() {
    let dir = workspace();
    let output = deckdiff(dir.path())
        .args(["run", "--input-name", "absent"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(!dir.path().join("store").exists());
}

#[test]
fn corrupt_master_exits_6_and_is_kept() {
    let dir = workspace();
    std::fs::create_dir_all(dir.path().join("store")).unwrap();
    std::fs::write(dir.path().join("store/master.json"), "{{{").unwrap();

    let output = deckdiff(dir.path()).arg("run").output().unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("store/master.json")).unwrap(),
        "{{{"
    );
    assert!(csv_files(&dir.path().join("output")).is_empty());
}

#[test]
fn wrong_shaped_master_exits_6_and_is_kept() {
    let dir = workspace();
    std::fs::create_dir_all(dir.path().join("store")).unwrap();
    std::fs::write(dir.path().join("store/master.json"), "[]").unwrap();

    let (output, report) = run_json(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(6));
    assert_eq!(report["error"], "master_corrupt");
    assert_eq!(
        std::fs::read_to_string(dir.path().join("store/master.json")).unwrap(),
        "[]"
    );
    assert!(csv_files(&dir.path().join("output")).is_empty());
}

#[test]
fn failed_master_save_exits_8_and_reports_artifact() {
    let dir = workspace();
    let (output, report) = run_json(dir.path(), &["--output-location", "store/master.json"]);

    assert_eq!(output.status.code(), Some(8));
    assert_eq!(report["error"], "master_write_failed");
    assert_eq!(report["stage"], "save_master");
    assert_eq!(report["exit_code"], 8);
    let artifact = report["artifact"].as_str().expect("artifact field");
    assert!(artifact.ends_with("Inbox.csv"), "artifact: {artifact}");
    let artifact = dir.path().join(artifact);
    assert_eq!(std::fs::read_to_string(artifact).unwrap(), "w1,d1\n");
}

#[test]
fn missing_required_setting_exits_9() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("deckdiff.toml"), "[files]\ninput_name = \"board\"\n").unwrap();

    let output = deckdiff(dir.path()).arg("run").output().unwrap();
    assert_eq!(output.status.code(), Some(9));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("master_name is required"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// validate / categories / init
// ---------------------------------------------------------------------------

#[test]
fn validate_prints_resolved_paths() {
    let dir = workspace();
    let output = deckdiff(dir.path()).arg("validate").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("input/board.json"), "stdout: {stdout}");
    assert!(stdout.contains("store/master.json"));
    assert!(stdout.contains("category: Inbox"));
}

#[test]
fn categories_lists_counts() {
    let dir = workspace();
    let output = deckdiff(dir.path())
        .args(["categories", "input/board.json", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid JSON array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "Inbox");
    assert_eq!(entries[0]["open_cards"], 1);
    assert_eq!(entries[0]["closed_cards"], 1);
    assert_eq!(entries[1]["name"], "Done");
}

#[test]
fn init_then_validate() {
    let dir = tempfile::tempdir().unwrap();
    let init = deckdiff(dir.path()).arg("init").output().unwrap();
    assert!(init.status.success());
    assert!(dir.path().join("deckdiff.toml").exists());

    let again = deckdiff(dir.path()).arg("init").output().unwrap();
    assert_eq!(again.status.code(), Some(9));

    let validate = deckdiff(dir.path()).arg("validate").output().unwrap();
    assert!(validate.status.success());
}
