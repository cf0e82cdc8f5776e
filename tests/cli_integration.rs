//! Integration tests for the CredVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  With
//! stdin piped, the binary reads the master password and every answer
//! line by line, so whole sessions can be scripted.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the credvault binary.
fn credvault() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("credvault").expect("binary should exist")
}

/// Helper: a temp dir with a config that keeps Argon2 cheap.
fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml")
        .write_str("argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n")
        .unwrap();
    tmp
}

#[test]
fn help_flag_shows_usage() {
    credvault()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Local password-protected credential store",
        ))
        .stdout(predicate::str::contains("--vault"));
}

#[test]
fn version_flag_shows_version() {
    credvault()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("credvault"));
}

#[test]
fn scripted_session_creates_and_uses_vault() {
    let tmp = workspace();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nadd\ngithub\nbob\np@ss\nlist\nfind\ngit\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved."))
        .stdout(predicate::str::contains("github: b*b"))
        .stdout(predicate::str::contains("github -> bob / p@ss"));

    tmp.child("vault.dat")
        .assert(predicate::str::starts_with("CREDVAULT/2 argon2id m=8192 t=1 p=1 "));
    tmp.child("vault.dat")
        .assert(predicate::str::contains("p@ss").not());

    // A second session sees the record and can remove it.
    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nremove\nGITHUB\nremove\ngithub\nlist\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed."))
        .stdout(predicate::str::contains("Not found."))
        .stdout(predicate::str::contains("github:").not());
}

#[test]
fn wrong_password_exits_before_the_loop() {
    let tmp = workspace();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("right-password\nexit\n")
        .assert()
        .success();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("wrong-password\nlist\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Access denied. Wrong master password.",
        ))
        .stdout(predicate::str::is_empty());
}

#[test]
fn non_vault_file_is_reported_as_invalid() {
    let tmp = workspace();
    tmp.child("vault.dat").write_str("hello world\n").unwrap();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nlist\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid vault file."));

    // The file is left alone.
    tmp.child("vault.dat").assert("hello world\n");
}

#[test]
fn empty_master_password_is_rejected() {
    let tmp = workspace();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("\nexit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("master password must not be empty"));

    tmp.child("vault.dat").assert(predicate::path::missing());
}

#[test]
fn unknown_command_is_reported() {
    let tmp = workspace();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nfrobnicate\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command."));
}

#[test]
fn vault_flag_overrides_default_path() {
    let tmp = workspace();
    tmp.child("secrets").create_dir_all().unwrap();

    credvault()
        .current_dir(tmp.path())
        .args(["--vault", "secrets/mine.dat"])
        .write_stdin("hunter2\nadd\nmail\nme\npw\nexit\n")
        .assert()
        .success();

    tmp.child("secrets/mine.dat").assert(predicate::path::exists());
    tmp.child("vault.dat").assert(predicate::path::missing());
}

#[test]
fn vault_path_comes_from_config() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml")
        .write_str(
            "vault_path = \"store.dat\"\nargon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n",
        )
        .unwrap();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nexit\n")
        .assert()
        .success();

    tmp.child("store.dat").assert(predicate::path::exists());
}

#[test]
fn malformed_config_is_an_error() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".credvault.toml").write_str("not valid {{toml").unwrap();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nexit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn skipped_record_lines_are_warned_about() {
    let tmp = workspace();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nadd\ngithub\nbob\np@ss\nexit\n")
        .assert()
        .success();

    let path = tmp.child("vault.dat");
    let contents = std::fs::read_to_string(path.path()).unwrap();
    path.write_str(&format!("{contents}garbage-line\n")).unwrap();

    credvault()
        .current_dir(tmp.path())
        .write_stdin("hunter2\nlist\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("github: b*b"))
        .stderr(predicate::str::contains("1 unreadable record line(s) were skipped"));
}
