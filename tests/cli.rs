//! Smoke tests for the stringz binary

use std::path::PathBuf;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn stringz(bundle: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stringz"))
        .arg("--dir")
        .arg(fixtures().join("bundles"))
        .args(["--bundle", bundle])
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("stringz should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_get_prints_resolved_values() {
    let output = stringz("app.messages", &["get", "title", "farewell"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Mailer Inbox\nGoodbye, Bob\n");
}

#[test]
fn test_get_with_locale() {
    let output = stringz("app.messages", &["--locale", "de", "get", "title"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "Postbote Posteingang\n");
}

#[test]
fn test_get_expect_mismatch_fails() {
    let output = stringz("app.messages", &["get", "inbox", "--expect", "s"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("does not match the expected conversion character 's'"));
}

#[test]
fn test_get_missing_key_fails() {
    let output = stringz("app.messages", &["get", "ghost"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("missing resource 'ghost'"));
}

#[test]
fn test_check_mapping_file() {
    let mapping = fixtures().join("mapping.toml");
    let output = stringz("app.messages", &["check", mapping.to_str().expect("utf-8 path")]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "checked 4 request(s), 0 failure(s)\n");
}

#[test]
fn test_keys_lists_own_keys_sorted() {
    let output = stringz("app.common", &["keys"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "appName = Mailer\nsignature = -- sent by Mailer\nuserName = Bob\n"
    );
}

#[test]
fn test_unknown_bundle_fails() {
    let output = stringz("app.nowhere", &["keys"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not found"));
}
