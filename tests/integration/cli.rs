//! Command-line behavior of the citation-manager binary

use predicates::prelude::*;

use crate::common::{MarkdownFixture, TestVault, run_cli};

fn vault_with_notes() -> TestVault {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("guide.md")).unwrap();
    vault.add(&MarkdownFixture::citing("notes.md", "guide.md")).unwrap();
    vault.write("clean.md", "[ok](guide.md#Setup) and [blk](guide.md#^note1)\n").unwrap();
    vault
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = assert_cmd::Command::cargo_bin("citation-manager").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_validate_clean_file_succeeds() {
    let vault = vault_with_notes();
    let output = run_cli(vault.path(), &["validate", "clean.md"]).unwrap();
    output
        .assert_success()
        .assert_stdout_contains("✓")
        .assert_stdout_contains("2 total, 2 valid, 0 warnings, 0 errors");
}

#[test]
fn test_validate_broken_file_fails() {
    let vault = vault_with_notes();
    let output = run_cli(vault.path(), &["validate", "notes.md"]).unwrap();
    output
        .assert_failure()
        .assert_stdout_contains("✗")
        .assert_stdout_contains("File not found: missing.md");
    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains("Validation failed: 1 of 5 citations are broken"));
}

#[test]
fn test_validate_json_and_line_filter() {
    let vault = vault_with_notes();
    let output = run_cli(
        vault.path(),
        &["validate", "notes.md", "--format", "json", "--lines", "3-6"],
    )
    .unwrap();
    output.assert_success();

    let json = output.json();
    assert_eq!(json["summary"]["total"], 4);
    assert_eq!(json["summary"]["errors"], 0);
    assert_eq!(json["citations"][0]["validation"]["status"], "valid");
}

#[test]
fn test_validate_scope_from_config_file() {
    let vault = TestVault::new().unwrap();
    vault.add(&MarkdownFixture::guide("docs/archive/moved.md")).unwrap();
    vault.write("docs/notes.md", "[it](moved.md#Setup)\n").unwrap();
    vault.write(".citation-manager.toml", "scope = \".\"\n").unwrap();

    let output = run_cli(vault.path(), &["validate", "docs/notes.md", "--format", "json"]).unwrap();
    output.assert_success();

    let validation = &output.json()["citations"][0]["validation"];
    assert_eq!(validation["status"], "warning");
    assert_eq!(validation["pathConversion"]["recommended"], "archive/moved.md");
}

#[test]
fn test_validate_missing_source_file() {
    let vault = TestVault::new().unwrap();
    let output = run_cli(vault.path(), &["validate", "nope.md"]).unwrap();
    output.assert_failure();
    assert!(output.stderr.contains("File not found"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let vault = vault_with_notes();
    let output = run_cli(vault.path(), &["--config", "absent.toml", "validate", "clean.md"]).unwrap();
    output.assert_failure();
    assert!(output.stderr.contains("absent.toml"));
}

#[test]
fn test_extract_links_outputs_bundle() {
    let vault = vault_with_notes();
    let output = run_cli(vault.path(), &["extract", "links", "notes.md", "--full-files"]).unwrap();
    output.assert_success();

    let json = output.json();
    assert_eq!(json["stats"]["totalLinks"], 5);
    assert_eq!(json["stats"]["uniqueContent"], 4);
    assert_eq!(json["citations"][2]["status"], "success");
    assert_eq!(json["citations"][4]["status"], "skipped");
}

#[test]
fn test_extract_header_and_file() {
    let vault = vault_with_notes();

    let output = run_cli(vault.path(), &["extract", "header", "guide.md", "Setup"]).unwrap();
    output.assert_success().assert_stdout_contains("Install the binary.");
    let json = output.json();
    let entry = json["contentIndex"].as_object().unwrap().values().next().unwrap().clone();
    assert!(entry["content"].as_str().unwrap().starts_with("## Setup"));

    let output = run_cli(vault.path(), &["extract", "file", "guide.md"]).unwrap();
    output.assert_success().assert_stdout_contains("Call it from anywhere.");
}

#[test]
fn test_extract_header_missing_anchor_fails() {
    let vault = vault_with_notes();
    let output = run_cli(vault.path(), &["extract", "header", "guide.md", "Nope"]).unwrap();
    output.assert_failure();
    assert_eq!(output.json()["citations"][0]["status"], "skipped");
    assert!(output.stderr.contains("Anchor not found: #Nope"));
}
