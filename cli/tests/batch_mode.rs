//! Exercises the compiled `empdb-cli` binary against a temporary database
//! file, the same way a user would from a shell.

use std::process::Command;

use tempfile::tempdir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_empdb_cli"))
}

#[test]
fn add_list_remove_last_roundtrip() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("employees.dat");

    let status = cli()
        .args(["--create", db.to_str().unwrap(), "add", "Alice", "1 Main St", "40"])
        .status()
        .expect("run add");
    assert!(status.success());

    let status = cli()
        .args([db.to_str().unwrap(), "add", "Bob", "2 Elm St", "20"])
        .status()
        .expect("run second add");
    assert!(status.success());

    let output = cli()
        .args([db.to_str().unwrap(), "list"])
        .output()
        .expect("run list");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(
        stdout,
        "Alice | 1 Main St | 40\nBob | 2 Elm St | 20\n"
    );

    let status = cli()
        .args([db.to_str().unwrap(), "remove-last"])
        .status()
        .expect("run remove-last");
    assert!(status.success());

    let output = cli()
        .args([db.to_str().unwrap(), "list"])
        .output()
        .expect("run list after remove");
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert_eq!(stdout, "Alice | 1 Main St | 40\n");
}

#[test]
fn remove_last_on_empty_database_fails_with_nonzero_exit() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("employees.dat");
    cli()
        .args(["--create", db.to_str().unwrap(), "list"])
        .status()
        .expect("create empty database");

    let status = cli()
        .args([db.to_str().unwrap(), "remove-last"])
        .status()
        .expect("run remove-last on empty db");
    assert!(!status.success());
}
