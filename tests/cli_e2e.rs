//! End-to-end CLI tests for the fetchqueue binary.

use std::io::{Read, Write};
use std::net::TcpListener;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Serves `requests` HTTP responses with the given body on a local port,
/// each with an accurate Content-Length, then exits.
fn spawn_file_server(body: &'static [u8], requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    std::thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let Ok(mut stream) = stream else { continue };
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
    });
    format!("http://{addr}")
}

/// Test that the binary without input exits with code 0 and prints guidance.
#[test]
fn test_binary_no_input_returns_zero() {
    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.write_stdin("").assert().success();
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Download files concurrently"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetchqueue"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test a successful download: exit code 0 and the file on disk.
#[test]
fn test_binary_downloads_url_to_directory() {
    let base = spawn_file_server(b"downloaded body", 1);
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.arg(format!("{base}/payload.bin"))
        .arg("-d")
        .arg(temp_dir.path())
        .arg("-q")
        .assert()
        .success();

    let written = std::fs::read(temp_dir.path().join("payload.bin")).unwrap();
    assert_eq!(written, b"downloaded body");
}

/// Test that URLs are read from stdin when no positional args are given.
#[test]
fn test_binary_reads_urls_from_stdin() {
    let base = spawn_file_server(b"from stdin", 1);
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.write_stdin(format!("{base}/piped.bin\n"))
        .arg("-d")
        .arg(temp_dir.path())
        .arg("-q")
        .assert()
        .success();

    assert!(temp_dir.path().join("piped.bin").exists());
}

/// Test that --json emits one progress line per chunk on stdout.
#[test]
fn test_binary_json_mode_emits_progress_lines() {
    let base = spawn_file_server(b"json body", 1);
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    let output = cmd
        .arg(format!("{base}/event.bin"))
        .arg("-d")
        .arg(temp_dir.path())
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let progress_lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .filter(|value: &serde_json::Value| value["event"] == "progress")
        .collect();

    assert!(!progress_lines.is_empty(), "no progress lines in: {stdout}");
    let last = progress_lines.last().unwrap();
    assert_eq!(last["file_name"], "event.bin");
    assert_eq!(last["percentage"], 100.0);
    assert!(last["speed"]["unit"].is_string());
}

/// Test that a queue where every item fails exits with code 1.
#[test]
fn test_binary_all_failed_exits_one() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    // A URL path ending in '/' cannot resolve to a file name.
    cmd.arg("http://127.0.0.1:9/unreachable/")
        .arg("-d")
        .arg(temp_dir.path())
        .arg("-q")
        .assert()
        .code(1);
}

/// Test that a mix of success and failure exits with code 2.
#[test]
fn test_binary_partial_failure_exits_two() {
    let base = spawn_file_server(b"survivor", 1);
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    cmd.arg(format!("{base}/good.bin"))
        .arg(format!("{base}/bad/"))
        .arg("-d")
        .arg(temp_dir.path())
        .arg("-q")
        .assert()
        .code(2);

    assert!(temp_dir.path().join("good.bin").exists());
}

/// Test that --json error events carry the failing URL.
#[test]
fn test_binary_json_mode_emits_error_events() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("fetchqueue").unwrap();
    let output = cmd
        .arg("http://127.0.0.1:9/nothing-here/")
        .arg("-d")
        .arg(temp_dir.path())
        .arg("--json")
        .assert()
        .code(1)
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let error_line = stdout
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("JSON line"))
        .find(|value| value["event"] == "error")
        .expect("an error event line");

    assert_eq!(error_line["url"], "http://127.0.0.1:9/nothing-here/");
    assert!(error_line["error"].as_str().is_some());
}
