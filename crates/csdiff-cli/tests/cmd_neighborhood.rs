//! Integration tests for `csdiff neighborhood`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(name);
    path.to_str().expect("utf-8 path").to_owned()
}

/// Runs `csdiff neighborhood v1 v2 <extra...>`.
fn neighborhood(extra: &[&str]) -> Output {
    let v1 = fixture("colours-v1.json");
    let v2 = fixture("colours-v2.json");
    let mut args = vec!["neighborhood", v1.as_str(), v2.as_str()];
    args.extend_from_slice(extra);
    Command::new(env!("CARGO_BIN_EXE_csdiff"))
        .args(&args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run csdiff")
}

fn json(out: &Output) -> serde_json::Value {
    serde_json::from_slice(&out.stdout).expect("valid JSON")
}

#[test]
fn radius_one_follows_changed_relationships() {
    let out = neighborhood(&["cool", "--radius", "1", "--no-color"]);
    assert_eq!(out.status.code(), Some(0));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(
        text.starts_with("Neighborhood of 'cool' (radius 1): 3 concepts, 2 relationships"),
        "stdout: {text}"
    );
    assert!(text.contains("~ 'blue' -> 'cool' [parent] (right)"), "stdout: {text}");
    assert!(text.contains("~ 'teal' -> 'cool' [parent] (left)"), "stdout: {text}");
}

#[test]
fn default_radius_is_two() {
    let out = neighborhood(&["cool", "--format", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let value = json(&out);
    assert_eq!(value["status"], "found");
    assert_eq!(value["radius"], 2);
    assert_eq!(value["depths"]["cool"], 1);
    assert_eq!(value["depths"]["green"], 2);
    assert!(value["depths"].get("red").is_none());
}

#[test]
fn radius_is_clamped_to_max_radius() {
    let out = neighborhood(&["cool", "-f", "json", "-r", "50", "--max-radius", "3"]);
    assert_eq!(out.status.code(), Some(0));
    let value = json(&out);
    assert_eq!(value["radius"], 3);
    assert_eq!(value["depths"]["red"], 3);
}

#[test]
fn unknown_code_exits_1_with_not_found_result() {
    let out = neighborhood(&["purple", "--format", "json"]);
    assert_eq!(out.status.code(), Some(1));
    let value = json(&out);
    assert_eq!(value["status"], "not_found");
    assert_eq!(value["focus"], "purple");
    assert!(
        String::from_utf8_lossy(&out.stderr).contains("'purple' is not defined"),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
}

#[test]
fn unknown_code_in_human_mode_writes_nothing_to_stdout() {
    let out = neighborhood(&["purple"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}
