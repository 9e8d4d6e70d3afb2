//! End-to-end tests that run the compiled `yam` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn yam_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_yam"))
}

/// Runs `yam` in `dir` with HOME pointed at `dir` so no user config leaks in.
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(yam_bin())
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute yam binary")
}

fn run_with_stdin(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = Command::new(yam_bin())
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn yam binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_help_exits_zero() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--help"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--lint"), "help output:\n{}", stdout);
}

#[test]
fn test_formats_file_in_place() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.yaml"), "b:   1\nlist: [z, a]\n").unwrap();

    let out = run(dir.path(), &["--sort", ".list", "a.yaml"]);
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read_to_string(dir.path().join("a.yaml")).unwrap(),
        "b: 1\nlist: [a, z]\n"
    );
}

#[test]
fn test_project_config_is_used() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".yam.yaml"), "indent: 4\n").unwrap();
    fs::write(dir.path().join("a.yaml"), "a:\n  b: 1\n").unwrap();

    let out = run(dir.path(), &["a.yaml"]);
    assert!(out.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("a.yaml")).unwrap(),
        "a:\n    b: 1\n"
    );
}

#[test]
fn test_flags_override_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".yam.yaml"), "indent: 4\n").unwrap();
    fs::write(dir.path().join("a.yaml"), "a:\n  b: 1\n").unwrap();

    let out = run(dir.path(), &["--indent", "3", "a.yaml"]);
    assert!(out.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("a.yaml")).unwrap(),
        "a:\n   b: 1\n"
    );
}

#[test]
fn test_lint_exit_codes() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.yaml"), "a: 1\n").unwrap();
    let out = run(dir.path(), &["--lint"]);
    assert!(out.status.success());

    fs::write(dir.path().join("bad.yaml"), "a:    1\n").unwrap();
    let out = run(dir.path(), &["--lint"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("--- want"), "stderr:\n{}", stderr);
    assert!(stderr.contains("bad.yaml"), "stderr:\n{}", stderr);
    assert_eq!(
        fs::read_to_string(dir.path().join("bad.yaml")).unwrap(),
        "a:    1\n"
    );
}

#[test]
fn test_stdin_to_stdout() {
    let dir = TempDir::new().unwrap();
    let out = run_with_stdin(dir.path(), &["--gap", "."], "a: 1\nb: 2\n");
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "a: 1\n\nb: 2\n");
}

#[test]
fn test_invalid_expression_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.yaml"), "a: 1\n").unwrap();

    let out = run(dir.path(), &["--sort", "nodot", "a.yaml"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nodot"));
}
