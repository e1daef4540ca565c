//! Integration tests for the `tick` CLI.
//!
//! Each test creates a temp directory, runs `tick` as a subprocess,
//! and verifies stdout, stderr and/or the store file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Get the path to the built `tick` binary.
fn tick_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tick");
    path
}

/// Run `tick` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tick(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tick_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tick");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tick` expecting success, return stdout.
fn run_tick_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tick(dir, args);
    if !success {
        panic!(
            "tick {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `tick` feeding `input` on stdin, returning (stdout, stderr, success).
fn run_tick_with_input(dir: &Path, args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = Command::new(tick_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tick");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// A fresh list in a temp dir
fn init_list() -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tick_ok(tmp.path(), &["init"]);
    tmp
}

/// Add a task and return its id
fn add(dir: &Path, text: &str) -> String {
    run_tick_ok(dir, &["add", text]).trim().to_string()
}

fn list_json(dir: &Path) -> serde_json::Value {
    let out = run_tick_ok(dir, &["list", "--json"]);
    serde_json::from_str(&out).unwrap()
}

fn stored_tasks(dir: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(dir.join(".tick/store.json")).unwrap();
    let store: serde_json::Value = serde_json::from_str(&raw).unwrap();
    serde_json::from_str(store["todos"].as_str().unwrap()).unwrap()
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_data_dir() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tick_ok(tmp.path(), &["init"]);
    assert!(out.contains("Initialized"));
    assert!(tmp.path().join(".tick/config.toml").exists());

    let (_, stderr, success) = run_tick(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("--force"));

    run_tick_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_commands_need_init() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_tick(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("tick init"));
}

#[test]
fn test_subdirectory_finds_list() {
    let tmp = init_list();
    let sub = tmp.path().join("a/b");
    fs::create_dir_all(&sub).unwrap();
    add(&sub, "from below");
    let out = run_tick_ok(tmp.path(), &["list"]);
    assert!(out.contains("from below"));
}

#[test]
fn test_data_dir_flag() {
    let tmp = init_list();
    let elsewhere = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().to_str().unwrap();
    run_tick_ok(elsewhere.path(), &["-C", dir, "add", "remote"]);
    let out = run_tick_ok(elsewhere.path(), &["list", "-C", dir]);
    assert!(out.contains("remote"));
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

#[test]
fn test_empty_list() {
    let tmp = init_list();
    let out = run_tick_ok(tmp.path(), &["list"]);
    assert!(out.contains("No tasks yet"));

    let parsed = list_json(tmp.path());
    assert_eq!(parsed["tasks"].as_array().unwrap().len(), 0);
    assert_eq!(parsed["summary"]["total"], 0);
}

#[test]
fn test_add_and_list() {
    let tmp = init_list();
    let (stdout, stderr, success) = run_tick(tmp.path(), &["add", "  Wash", "car  "]);
    assert!(success);
    assert!(stdout.trim().parse::<u64>().is_ok());
    assert!(stderr.contains("Task added successfully!"));

    let parsed = list_json(tmp.path());
    let tasks = parsed["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["text"], "Wash car");
    assert_eq!(tasks[0]["completed"], false);
    assert_eq!(tasks[0]["id"].to_string(), stdout.trim());
}

#[test]
fn test_add_blank_is_rejected() {
    let tmp = init_list();
    let (_, stderr, success) = run_tick(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("Please write something first!"));
    assert_eq!(list_json(tmp.path())["summary"]["total"], 0);
}

#[test]
fn test_ids_increase() {
    let tmp = init_list();
    let a: u64 = add(tmp.path(), "one").parse().unwrap();
    let b: u64 = add(tmp.path(), "two").parse().unwrap();
    assert!(b > a);
}

#[test]
fn test_toggle_and_filters() {
    let tmp = init_list();
    let milk = add(tmp.path(), "Buy milk");
    add(tmp.path(), "Wash car");

    let out = run_tick_ok(tmp.path(), &["toggle", &milk]);
    assert!(out.contains("[x] Buy milk"));

    let done = run_tick_ok(tmp.path(), &["list", "--done"]);
    assert!(done.contains("Buy milk"));
    assert!(!done.contains("Wash car"));

    let pending = run_tick_ok(tmp.path(), &["list", "--pending"]);
    assert!(pending.contains("Wash car"));
    assert!(!pending.contains("Buy milk"));

    let grep = run_tick_ok(tmp.path(), &["list", "--grep", "MILK"]);
    assert!(grep.contains("Buy milk"));
    assert!(!grep.contains("Wash car"));

    // Toggle back
    let out = run_tick_ok(tmp.path(), &["toggle", &milk]);
    assert!(out.contains("[ ] Buy milk"));
}

#[test]
fn test_toggle_missing_id() {
    let tmp = init_list();
    let (_, stderr, success) = run_tick(tmp.path(), &["toggle", "12345"]);
    assert!(!success);
    assert!(stderr.contains("task not found: 12345"));
}

#[test]
fn test_delete_with_yes() {
    let tmp = init_list();
    let id = add(tmp.path(), "Wash car");
    let (_, stderr, success) = run_tick(tmp.path(), &["delete", &id, "--yes"]);
    assert!(success);
    assert!(stderr.contains("Task deleted!"));
    assert_eq!(stored_tasks(tmp.path()).as_array().unwrap().len(), 0);
}

#[test]
fn test_delete_asks_first() {
    let tmp = init_list();
    let id = add(tmp.path(), "Wash car");

    let (_, stderr, success) = run_tick_with_input(tmp.path(), &["delete", &id], "n\n");
    assert!(success);
    assert!(stderr.contains("Are you sure you want to delete this task? [y/N]"));
    assert_eq!(list_json(tmp.path())["summary"]["total"], 1);

    // No stdin at all declines too
    run_tick_ok(tmp.path(), &["delete", &id]);
    assert_eq!(list_json(tmp.path())["summary"]["total"], 1);

    let (_, _, success) = run_tick_with_input(tmp.path(), &["delete", &id], "y\n");
    assert!(success);
    assert_eq!(list_json(tmp.path())["summary"]["total"], 0);
}

#[test]
fn test_edit_with_text() {
    let tmp = init_list();
    let id = add(tmp.path(), "Buy milk");
    run_tick_ok(tmp.path(), &["toggle", &id]);

    let out = run_tick_ok(tmp.path(), &["edit", &id, "Buy", "oat", "milk"]);
    assert!(out.contains("[x] Buy oat milk"));
    let tasks = stored_tasks(tmp.path());
    assert_eq!(tasks[0]["text"], "Buy oat milk");
    assert_eq!(tasks[0]["completed"], true);
}

#[test]
fn test_edit_from_stdin() {
    let tmp = init_list();
    let id = add(tmp.path(), "Buy milk");

    // Blank answer keeps the text
    let (_, stderr, success) = run_tick_with_input(tmp.path(), &["edit", &id], "\n");
    assert!(success);
    assert!(stderr.contains("Edit task: [Buy milk]"));
    assert_eq!(stored_tasks(tmp.path())[0]["text"], "Buy milk");

    let (stdout, _, success) = run_tick_with_input(tmp.path(), &["edit", &id], "  Buy bread \n");
    assert!(success);
    assert!(stdout.contains("Buy bread"));
    assert_eq!(stored_tasks(tmp.path())[0]["text"], "Buy bread");
}

#[test]
fn test_edit_to_blank_fails() {
    let tmp = init_list();
    let id = add(tmp.path(), "Buy milk");
    let (_, _, success) = run_tick(tmp.path(), &["edit", &id, "  "]);
    assert!(!success);
    assert_eq!(stored_tasks(tmp.path())[0]["text"], "Buy milk");
}

#[test]
fn test_stats() {
    let tmp = init_list();
    let a = add(tmp.path(), "one");
    add(tmp.path(), "two");
    add(tmp.path(), "three");
    run_tick_ok(tmp.path(), &["toggle", &a]);

    let out = run_tick_ok(tmp.path(), &["stats"]);
    assert_eq!(out.trim(), "3 total  1 done  2 pending");

    let out = run_tick_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["completed"], 1);
    assert_eq!(parsed["pending"], 2);
}

#[test]
fn test_json_mode_is_quiet() {
    let tmp = init_list();
    let (stdout, stderr, success) = run_tick(tmp.path(), &["--json", "add", "quiet"]);
    assert!(success);
    assert!(!stderr.contains("Task added"));
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["text"], "quiet");
}

#[test]
fn test_corrupt_store_reports_error() {
    let tmp = init_list();
    fs::write(tmp.path().join(".tick/store.json"), r#"{"todos": "not json"}"#).unwrap();
    let (_, stderr, success) = run_tick(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("not valid JSON"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_get_and_set() {
    let tmp = init_list();
    let out = run_tick_ok(tmp.path(), &["config", "notice.duration_secs"]);
    assert_eq!(out.trim(), "3");

    run_tick_ok(tmp.path(), &["config", "notice.duration_secs", "5"]);
    let out = run_tick_ok(tmp.path(), &["config", "notice.duration_secs"]);
    assert_eq!(out.trim(), "5");

    // Comments in the template survive the edit
    let text = fs::read_to_string(tmp.path().join(".tick/config.toml")).unwrap();
    assert!(text.contains("# how long confirmation notices stay on screen"));
    assert!(text.contains("duration_secs = 5"));
}

#[test]
fn test_config_custom_key() {
    let tmp = init_list();
    add(tmp.path(), "in todos");
    run_tick_ok(tmp.path(), &["config", "storage.key", "other"]);
    assert_eq!(list_json(tmp.path())["summary"]["total"], 0);
    run_tick_ok(tmp.path(), &["config", "storage.key", "todos"]);
    assert_eq!(list_json(tmp.path())["summary"]["total"], 1);
}

#[test]
fn test_config_rejects_bad_key() {
    let tmp = init_list();
    let (_, _, success) = run_tick(tmp.path(), &["config", "nope"]);
    assert!(!success);
}

#[test]
fn test_concurrent_adds_all_survive() {
    let tmp = init_list();
    let children: Vec<_> = (0..8)
        .map(|i| {
            Command::new(tick_bin())
                .args(["add", &format!("task {i}")])
                .current_dir(tmp.path())
                .env_remove("RUST_LOG")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .expect("failed to run tick")
        })
        .collect();
    for mut child in children {
        assert!(child.wait().unwrap().success());
    }

    let tasks = stored_tasks(tmp.path());
    let mut texts: Vec<&str> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    texts.sort_unstable();
    let expected: Vec<String> = (0..8).map(|i| format!("task {i}")).collect();
    assert_eq!(texts, expected);
    assert!(tmp.path().join(".tick/store.json.lock").exists());
}
