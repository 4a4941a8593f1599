use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
}

fn run_json_session(input: &str) -> Vec<serde_json::Value> {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let config_path = temp_path("cli-delete-config.json");

    let mut child = Command::new(exe)
        .arg("--json")
        .env("TASKLIST_CONFIG_PATH", &config_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn session");

    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("failed to write to stdin");

    let output = child.wait_with_output().expect("failed to read output");
    assert!(output.status.success());

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect()
}

fn last_snapshot(lines: &[serde_json::Value]) -> &serde_json::Value {
    lines
        .iter()
        .rev()
        .find(|line| line.get("active_view").is_some())
        .expect("status snapshot")
}

fn titles(tasks: &serde_json::Value) -> Vec<String> {
    tasks
        .as_array()
        .expect("task array")
        .iter()
        .map(|task| task["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn confirm_removes_requested_task() {
    let lines = run_json_session("add A one\nadd B two\ndelete 1\nconfirm\ntoggle 1\nstatus\n");

    let snapshot = last_snapshot(&lines);
    assert!(titles(&snapshot["todo"]).is_empty());
    assert_eq!(titles(&snapshot["completed"]), vec!["B"]);
    assert!(snapshot["pending_delete_index"].is_null());
    assert!(lines.iter().any(|line| line["event"] == "task_deleted"
        && line["task"]["title"] == "A"));
}

#[test]
fn cancel_keeps_task() {
    let lines = run_json_session("add A one\ndelete 1\nstatus\ncancel\nstatus\n");

    let pending = lines
        .iter()
        .find(|line| line.get("active_view").is_some())
        .expect("first status snapshot");
    assert_eq!(pending["pending_delete_index"], 0);

    let snapshot = last_snapshot(&lines);
    assert_eq!(titles(&snapshot["todo"]), vec!["A"]);
    assert!(snapshot["pending_delete_index"].is_null());
}

#[test]
fn confirm_without_request_changes_nothing() {
    let lines = run_json_session("add A one\nconfirm\nstatus\n");

    assert!(lines.iter().any(|line| line["pending_delete"].is_null()
        && line.get("pending_delete").is_some()));
    assert_eq!(titles(&last_snapshot(&lines)["todo"]), vec!["A"]);
}

#[test]
fn second_request_replaces_first() {
    let lines = run_json_session("add A one\nadd B two\ndelete 1\ndelete 2\nyes\nstatus\n");

    assert_eq!(titles(&last_snapshot(&lines)["todo"]), vec!["A"]);
}
