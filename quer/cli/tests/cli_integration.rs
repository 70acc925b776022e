//! Integration tests for the quer CLI.
//!
//! These tests verify end-to-end CLI behavior using assert_cmd, with the
//! script directory pointed at a temporary directory.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quer_cmd(scripts: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quer").unwrap();
    cmd.env("QUER_SCRIPT_DIR", scripts.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write_script(scripts: &TempDir, name: &str, contents: &str) {
    fs::write(scripts.path().join(format!("{name}.querscript")), contents).unwrap();
}

#[test]
fn cli_shows_help() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quer Help Menu"))
        .stdout(predicate::str::contains("--record"))
        .stdout(predicate::str::contains("--listscripts"));
}

#[test]
fn cli_short_help_works() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quer Help Menu"));
}

#[test]
fn cli_shows_version() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("[quer] Version 1.2.0."));
}

#[test]
fn cli_rejects_record_without_name() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("-r")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid syntax"))
        .stderr(predicate::str::contains("need a valid script name"));
}

#[test]
fn cli_rejects_unknown_arguments() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown command argument"));
}

#[test]
fn cli_records_a_script_from_stdin() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .args(["-r", "greet"])
        .write_stdin("echo hello\nshow\necho oops\nundo\necho world\ndone\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quer (Record Mode)"))
        .stdout(predicate::str::contains("Recording"));

    let recorded = fs::read_to_string(scripts.path().join("greet.querscript")).unwrap();
    assert_eq!(recorded, "echo hello\necho world\n");
}

#[test]
fn cli_refuses_to_record_over_existing_script() {
    let scripts = TempDir::new().unwrap();
    write_script(&scripts, "greet", "echo original\n");

    quer_cmd(&scripts)
        .args(["-r", "greet"])
        .write_stdin("echo replaced\ndone\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let contents = fs::read_to_string(scripts.path().join("greet.querscript")).unwrap();
    assert_eq!(contents, "echo original\n");
}

#[test]
fn cli_refuses_to_play_missing_script() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .args(["-p", "nothing-here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"))
        .stdout(predicate::str::contains("Playback Mode").not());
}

#[cfg(unix)]
#[test]
fn cli_plays_back_a_script_in_order() {
    let scripts = TempDir::new().unwrap();
    write_script(&scripts, "pair", "echo played-one\necho played-two\n");

    quer_cmd(&scripts)
        .args(["-p", "pair"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. echo played-one"))
        .stdout(predicate::str::contains("2. echo played-two"))
        .stdout(predicate::str::contains("played-one\nplayed-two\n"));
}

#[cfg(unix)]
#[test]
fn cli_runs_queued_commands_on_done() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .write_stdin("echo ran-first\necho ran-second\ndone\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ran-first\nran-second\n"))
        .stdout(predicate::str::contains("(Ran 2 commands in"));
}

#[test]
fn cli_quit_runs_nothing() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .write_stdin("echo should-not-run\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("should-not-run").not())
        .stdout(predicate::str::contains("Executing").not());
}

#[test]
fn cli_lists_scripts() {
    let scripts = TempDir::new().unwrap();
    write_script(&scripts, "beta", "ls\n");
    write_script(&scripts, "alpha", "pwd\n");

    quer_cmd(&scripts)
        .arg("-ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha beta"));
}

#[test]
fn cli_lists_nothing_for_empty_directory() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("--listscripts")
        .assert()
        .success()
        .stdout(predicate::str::contains("No quer scripts found"));
}

#[test]
fn cli_clean_removes_everything() {
    let scripts = TempDir::new().unwrap();
    write_script(&scripts, "a", "ls\n");
    write_script(&scripts, "b", "ls\n");
    fs::create_dir_all(scripts.path().join("leftover").join("inner")).unwrap();

    quer_cmd(&scripts)
        .arg("-c")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 3 entries"));

    assert_eq!(fs::read_dir(scripts.path()).unwrap().count(), 0);
}

#[test]
fn cli_where_prints_script_directory() {
    let scripts = TempDir::new().unwrap();
    quer_cmd(&scripts)
        .arg("--where")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            scripts.path().display().to_string(),
        ));
}
