//! Integration tests for `csdiff diff`.
#![allow(clippy::expect_used)]

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

/// Path to a fixture file of this crate.
fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path.to_str().expect("utf-8 path").to_owned()
}

fn csdiff(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_csdiff"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run csdiff")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// exit codes 0 and 1
// ---------------------------------------------------------------------------

#[test]
fn identical_documents_exit_0() {
    let v1 = fixture("colours-v1.json");
    let out = csdiff(&["diff", &v1, &v1]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(
        text.contains("metadata: 0 different (0 unexpected)"),
        "stdout: {text}"
    );
    assert!(text.contains("0 changed, 6 unchanged"), "stdout: {text}");
}

#[test]
fn changed_documents_exit_1_and_list_changes() {
    let out = csdiff(&[
        "diff",
        "--no-color",
        &fixture("colours-v1.json"),
        &fixture("colours-v2.json"),
    ]);
    assert_eq!(out.status.code(), Some(1), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("  - teal \"Teal\""), "stdout: {text}");
    assert!(text.contains("  + blue \"Blue\""), "stdout: {text}");
    assert!(text.contains("  ~ red"), "stdout: {text}");
    assert!(
        text.contains("property ~ hex: #ff0000 -> #FF0000"),
        "stdout: {text}"
    );
    assert!(
        text.contains("~ version: \"1.0.0\" -> \"2.0.0\" (expected)"),
        "stdout: {text}"
    );
    assert!(stderr(&out).is_empty(), "differences are not an error message");
}

#[test]
fn summary_only_prints_one_line() {
    let out = csdiff(&[
        "diff",
        "--summary-only",
        &fixture("colours-v1.json"),
        &fixture("colours-v2.json"),
    ]);
    assert_eq!(out.status.code(), Some(1));
    let text = stdout(&out);
    assert_eq!(text.lines().count(), 1, "stdout: {text}");
    assert!(
        text.contains("1 only in left, 1 only in right, 1 changed, 4 unchanged"),
        "stdout: {text}"
    );
}

// ---------------------------------------------------------------------------
// JSON output
// ---------------------------------------------------------------------------

#[test]
fn json_output_is_the_full_diff() {
    let out = csdiff(&[
        "diff",
        "--format",
        "json",
        &fixture("colours-v1.json"),
        &fixture("colours-v2.json"),
    ]);
    assert_eq!(out.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["only_in_left"], serde_json::json!(["teal"]));
    assert_eq!(value["only_in_right"], serde_json::json!(["blue"]));
    assert_eq!(value["metadata"][2]["item"], "version");
    assert_eq!(value["metadata"][2]["expect_differences"], true);
    assert_eq!(value["concepts"]["red"]["properties"][0]["key"], "hex");
}

#[test]
fn expect_different_replaces_the_default_set() {
    let out = csdiff(&[
        "diff",
        "-f",
        "json",
        "--summary-only",
        "--expect-different",
        "date",
        &fixture("colours-v1.json"),
        &fixture("colours-v2.json"),
    ]);
    assert_eq!(out.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["metadata_different"], 2);
    assert_eq!(value["metadata_unexpected"], 2);
}

// ---------------------------------------------------------------------------
// stdin
// ---------------------------------------------------------------------------

#[test]
fn right_document_can_come_from_stdin() {
    let v1 = fixture("colours-v1.json");
    let contents = std::fs::read(&v1).expect("read fixture");
    let mut child = Command::new(env!("CARGO_BIN_EXE_csdiff"))
        .args(["diff", &v1, "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn csdiff");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(&contents)
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
}

#[test]
fn both_documents_from_stdin_is_rejected() {
    let out = csdiff(&["diff", "-", "-"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("only one document"));
}

// ---------------------------------------------------------------------------
// exit code 2
// ---------------------------------------------------------------------------

#[test]
fn missing_file_exits_2() {
    let out = csdiff(&["diff", "/no/such/colours.json", &fixture("colours-v2.json")]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("file not found"), "stderr: {}", stderr(&out));
    assert!(out.stdout.is_empty());
}

#[test]
fn non_json_input_exits_2() {
    let out = csdiff(&["diff", &fixture("not-json.txt"), &fixture("colours-v2.json")]);
    assert_eq!(out.status.code(), Some(2));
    assert!(
        stderr(&out).contains("is not a CodeSystem"),
        "stderr: {}",
        stderr(&out)
    );
}

#[test]
fn duplicate_code_names_the_failing_side() {
    let out = csdiff(&[
        "diff",
        &fixture("colours-v1.json"),
        &fixture("duplicate-code.json"),
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(
        stderr(&out).contains("right document"),
        "stderr: {}",
        stderr(&out)
    );
}

#[test]
fn oversized_input_exits_2() {
    let out = csdiff(&[
        "diff",
        "--max-file-size",
        "16",
        &fixture("colours-v1.json"),
        &fixture("colours-v2.json"),
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("too large"), "stderr: {}", stderr(&out));
}

// ---------------------------------------------------------------------------
// logging
// ---------------------------------------------------------------------------

#[test]
fn rust_log_overrides_quiet() {
    let v1 = fixture("colours-v1.json");
    let out = Command::new(env!("CARGO_BIN_EXE_csdiff"))
        .args(["diff", "-q", &v1, &v1])
        .env("RUST_LOG", "info")
        .output()
        .expect("run csdiff");
    assert_eq!(out.status.code(), Some(0));
    assert!(stderr(&out).contains("INFO"), "stderr: {}", stderr(&out));
    assert!(!stdout(&out).contains("INFO"));
}

#[test]
fn quiet_run_logs_nothing() {
    let v1 = fixture("colours-v1.json");
    let out = csdiff(&["diff", "-q", &v1, &v1]);
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stderr.is_empty(), "stderr: {}", stderr(&out));
}
