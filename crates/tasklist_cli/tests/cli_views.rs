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

fn run_session(config: Option<serde_json::Value>, args: &[&str], input: &str) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_tasklist");
    let config_path = temp_path("cli-views-config.json");
    if let Some(config) = config {
        std::fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();
    }

    let mut child = Command::new(exe)
        .args(args)
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
    std::fs::remove_file(&config_path).ok();
    output
}

#[test]
fn completed_tasks_move_to_completed_view() {
    let output = run_session(None, &[], "add A one\nadd B two\ndone 1\nview completed\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task: A"));
    assert!(stdout.contains("Completed (1)"));
}

#[test]
fn switching_back_keeps_order() {
    let output = run_session(
        None,
        &["--json"],
        "add A one\nadd B two\nadd C three\ntab completed\ntab todo\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let last: serde_json::Value =
        serde_json::from_str(stdout.lines().last().expect("output")).unwrap();
    assert_eq!(last["view"], "todo");
    let titles: Vec<&str> = last["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[test]
fn position_outside_view_is_not_found() {
    let output = run_session(None, &[], "add A one\ntoggle 3\n");
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found - no task at position 3 in To Do"));
}

#[test]
fn config_aliases_and_notice_backend_apply() {
    let config = serde_json::json!({
        "aliases": { "finish": "toggle" },
        "notice": { "backend": "off" }
    });
    let output = run_session(Some(config), &[], "add A one\nfinish 1\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task: A"));
    assert!(!stdout.contains("Task added!"));
}

#[test]
fn config_override_wins_over_file() {
    let config = serde_json::json!({ "notice": { "backend": "off" } });
    let output = run_session(
        Some(config),
        &["--config-override", "notice.backend=terminal"],
        "add A one\n",
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task added!"));
}

#[test]
fn bad_config_override_fails_fast() {
    let output = run_session(None, &["--config-override", "colour=red"], "");
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown config field 'colour'"));
}

#[test]
fn broken_config_file_falls_back_to_defaults() {
    let config_path = temp_path("cli-views-broken.json");
    std::fs::write(&config_path, "{ not json").unwrap();

    let mut child = Command::new(env!("CARGO_BIN_EXE_tasklist"))
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
        .write_all(b"add A one\n")
        .expect("failed to write to stdin");
    let output = child.wait_with_output().expect("failed to read output");
    std::fs::remove_file(&config_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task added!"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("using default configuration"));
}
