//! Tests for error handling, exit codes and suggestions.

use std::fs;
use std::path::Path;

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

fn tabledef(dir: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("tabledef");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("TABLEDEF_DEFINITIONS_DIR");
    cmd
}

fn with_users() -> TempDir {
    let temp = TempDir::new().unwrap();
    let tables = temp.path().join("definitions/tables");
    fs::create_dir_all(&tables).unwrap();
    fs::write(tables.join("users.td"), "COLUMNS: id, null, false, null, id;").unwrap();
    fs::write(
        tables.join("audit.td"),
        "[*BASE*] COLUMNS: created_by, null, false, null, string;",
    )
    .unwrap();
    temp
}

#[test]
fn missing_definitions_directory_is_not_found() {
    let temp = TempDir::new().unwrap();
    tabledef(temp.path())
        .args(["order"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Definitions directory not found"))
        .stderr(predicate::str::contains("tabledef init --example"));
}

#[test]
fn unknown_table_is_skipped_after_output() {
    let temp = with_users();
    tabledef(temp.path())
        .args(["order", "users", "ghost"])
        .assert()
        .code(2)
        .stdout("users\n")
        .stderr(predicate::str::contains("1 table(s) skipped: ghost"));
}

#[test]
fn base_table_is_not_creatable() {
    let temp = with_users();
    tabledef(temp.path())
        .args(["show", "audit"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Base table 'audit' is not creatable"))
        .stderr(predicate::str::contains("--type base"));
}

#[test]
fn show_unknown_table_is_not_found() {
    let temp = with_users();
    tabledef(temp.path())
        .args(["show", "ghost"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ghost"));
}

#[test]
fn ordering_base_type_is_invalid_input() {
    let temp = with_users();
    tabledef(temp.path())
        .args(["order", "--type", "base"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn unknown_config_key_is_configuration_error() {
    let temp = TempDir::new().unwrap();
    tabledef(temp.path())
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn explicit_missing_config_file_fails() {
    let temp = with_users();
    tabledef(temp.path())
        .args(["--config", "nope.toml", "order"])
        .assert()
        .code(4);
}

#[test]
fn invalid_argument_exits_two() {
    let temp = with_users();
    tabledef(temp.path())
        .args(["seed", "--records", "many"])
        .assert()
        .code(2);
}
