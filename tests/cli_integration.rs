//! Integration tests for the `task` CLI.
//!
//! Each test runs `task` as a subprocess in a temp directory and checks
//! stdout and/or the contents of task.json.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Get the path to the built `task` binary.
fn task_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_task"))
}

/// Run `task` with the given args in the given directory, returning (stdout, stderr, success).
fn run_task(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(task_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run task");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `task` expecting success, return stdout.
fn run_task_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_task(dir, args);
    if !success {
        panic!(
            "task {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn read_tasks(dir: &Path) -> serde_json::Value {
    let content = fs::read_to_string(dir.join("task.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Add a task via `--json` and return its id.
fn add_task(dir: &Path, title: &str) -> i64 {
    let out = run_task_ok(dir, &["--json", "add", title]);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    value["task"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Basics
// ---------------------------------------------------------------------------

#[test]
fn test_no_args_prints_welcome() {
    let tmp = TempDir::new().unwrap();
    let out = run_task_ok(tmp.path(), &[]);
    assert!(out.contains("Welcome to the CLI Task Manager"));
    assert!(out.contains("delete-all"));
}

#[test]
fn test_command_creates_task_file() {
    let tmp = TempDir::new().unwrap();
    let out = run_task_ok(tmp.path(), &["list"]);
    assert!(out.contains("No tasks found."));
    assert_eq!(fs::read_to_string(tmp.path().join("task.json")).unwrap(), "[]");
}

#[test]
fn test_add_writes_pretty_json() {
    let tmp = TempDir::new().unwrap();
    let out = run_task_ok(tmp.path(), &["add", "Buy", "milk"]);
    assert!(out.contains("Task added successfully!"));

    let content = fs::read_to_string(tmp.path().join("task.json")).unwrap();
    assert!(content.starts_with("[\n  {\n    \"id\": "));
    let tasks = read_tasks(tmp.path());
    assert_eq!(tasks.as_array().unwrap().len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["completed"], false);
}

#[test]
fn test_add_blank_title_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_task(tmp.path(), &["add", "   "]);
    assert!(!success);
    assert!(stderr.contains("task title cannot be empty"));
    assert_eq!(read_tasks(tmp.path()), serde_json::json!([]));
}

#[test]
fn test_missing_argument_is_usage_error() {
    let tmp = TempDir::new().unwrap();
    let (_, _, success) = run_task(tmp.path(), &["done"]);
    assert!(!success);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_add_done_delete_lifecycle() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();

    let id = add_task(dir, "Buy milk");
    let id_text = id.to_string();

    let out = run_task_ok(dir, &["list"]);
    assert!(out.contains(&id_text));
    assert!(out.contains("Buy milk"));
    assert!(out.contains('✗'));
    assert!(!out.contains('✓'));

    let out = run_task_ok(dir, &["done", &id_text]);
    assert!(out.contains("Task marked as complete"));
    let out = run_task_ok(dir, &["list"]);
    assert!(out.contains('✓'));
    assert_eq!(read_tasks(dir)[0]["completed"], true);

    let out = run_task_ok(dir, &["undone", &id_text]);
    assert!(out.contains("Task marked as incomplete"));
    assert_eq!(read_tasks(dir)[0]["completed"], false);

    let out = run_task_ok(dir, &["delete", &id_text]);
    assert!(out.contains("Task deleted successfully!"));
    let out = run_task_ok(dir, &["list"]);
    assert!(out.contains("No tasks found."));
}

#[test]
fn test_rapid_adds_get_distinct_ids() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let a = add_task(dir, "A");
    let b = add_task(dir, "B");
    assert!(b > a);

    run_task_ok(dir, &["done", &b.to_string()]);
    let tasks = read_tasks(dir);
    assert_eq!(tasks[0]["title"], "A");
    assert_eq!(tasks[0]["completed"], false);
    assert_eq!(tasks[1]["title"], "B");
    assert_eq!(tasks[1]["completed"], true);
}

#[test]
fn test_unknown_id_reports_not_found_without_writing() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    add_task(dir, "keep me");
    let before = fs::read_to_string(dir.join("task.json")).unwrap();

    for cmd in ["done", "undone", "delete"] {
        for id in ["123", "not-a-number"] {
            let out = run_task_ok(dir, &[cmd, id]);
            assert!(out.contains("Task not found"), "{cmd} {id}: {out}");
        }
    }
    assert_eq!(fs::read_to_string(dir.join("task.json")).unwrap(), before);
}

#[test]
fn test_delete_all_then_list() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    add_task(dir, "one");
    add_task(dir, "two");

    let out = run_task_ok(dir, &["delete-all"]);
    assert!(out.contains("All tasks deleted"));
    assert_eq!(read_tasks(dir), serde_json::json!([]));
    assert!(run_task_ok(dir, &["list"]).contains("No tasks found."));

    // Already empty
    assert!(run_task_ok(dir, &["delete-all"]).contains("All tasks deleted"));
}

// ---------------------------------------------------------------------------
// Flags and failure handling
// ---------------------------------------------------------------------------

#[test]
fn test_list_json_matches_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    add_task(dir, "first");
    add_task(dir, "second");

    let out = run_task_ok(dir, &["list", "--json"]);
    let listed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(listed, read_tasks(dir));
}

#[test]
fn test_dir_flag_uses_other_directory() {
    let tmp = TempDir::new().unwrap();
    let cwd = tmp.path().join("cwd");
    let other = tmp.path().join("other");
    fs::create_dir_all(&cwd).unwrap();
    fs::create_dir_all(&other).unwrap();

    run_task_ok(&cwd, &["-C", other.to_str().unwrap(), "add", "elsewhere"]);
    assert_eq!(read_tasks(&other)[0]["title"], "elsewhere");
    assert!(!cwd.join("task.json").exists());
}

#[test]
fn test_dir_flag_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_task(tmp.path(), &["-C", "does-not-exist", "list"]);
    assert!(!success);
    assert!(stderr.contains("cannot resolve -C path"));
}

#[test]
fn test_corrupt_file_is_backed_up() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("task.json"), "{ broken").unwrap();

    let (stdout, stderr, success) = run_task(dir, &["list"]);
    assert!(success);
    assert!(stdout.contains("No tasks found."));
    assert!(stderr.contains("could not parse task file"));
    assert_eq!(
        fs::read_to_string(dir.join("task.json.bak")).unwrap(),
        "{ broken"
    );

    // A later write starts a fresh list
    add_task(dir, "fresh");
    assert_eq!(read_tasks(dir).as_array().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_write_failure_exits_nonzero() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("ro");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("task.json"), "[]").unwrap();
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).unwrap();

    // Root ignores directory permissions; nothing to check there.
    let probe = dir.join(".probe");
    if fs::write(&probe, "").is_ok() {
        let _ = fs::remove_file(&probe);
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let (stdout, stderr, success) = run_task(&dir, &["add", "x"]);
    fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(!success);
    assert!(!stdout.contains("Task added"));
    assert!(stderr.contains("could not write"));
    assert_eq!(read_tasks(&dir), serde_json::json!([]));
}
