//! Integration tests for file discovery, reading and atomic writes.

use std::fs;
use std::io::Write;

use tempfile::{NamedTempFile, TempDir};
use yam::file::is_yaml_path;
use yam::file::loader::{collect_yaml_paths, read_source};
use yam::file::saver::write_file_atomic;
use yam::Error;

#[test]
fn test_read_source_returns_raw_bytes() {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "name: test   \r\n").unwrap();

    let bytes = read_source(temp_file.path()).unwrap();
    assert_eq!(bytes, b"name: test   \r\n");
}

#[test]
fn test_read_source_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yaml");

    match read_source(&missing) {
        Err(Error::Io { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected an I/O error, got {:?}", other),
    }
}

#[test]
fn test_collect_mixes_files_and_directories() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("configs");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("z.yaml"), "z: 1\n").unwrap();
    fs::write(sub.join("a.yml"), "a: 1\n").unwrap();
    fs::write(sub.join("skip.json"), "{}").unwrap();
    let single = dir.path().join("single.yaml");
    fs::write(&single, "s: 1\n").unwrap();

    let collected = collect_yaml_paths(&[single.clone(), sub.clone()]).unwrap();
    assert_eq!(collected, vec![single, sub.join("a.yml"), sub.join("z.yaml")]);
}

#[test]
fn test_collect_does_not_recurse() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).unwrap();
    fs::write(nested.join("deep.yaml"), "d: 1\n").unwrap();

    let collected = collect_yaml_paths(&[dir.path().to_path_buf()]).unwrap();
    assert!(collected.is_empty());
}

#[test]
fn test_write_file_atomic_creates_and_replaces() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.yaml");

    write_file_atomic(&path, b"first: 1\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "first: 1\n");

    write_file_atomic(&path, b"second: 2\n").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "second: 2\n");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_write_file_atomic_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("no-such-dir").join("out.yaml");
    assert!(matches!(
        write_file_atomic(&path, b"a: 1\n"),
        Err(Error::Io { .. })
    ));
}

#[test]
fn test_yaml_extensions() {
    assert!(is_yaml_path("a.yaml"));
    assert!(is_yaml_path("dir/b.yml"));
    assert!(!is_yaml_path("c.YAML.bak"));
    assert!(!is_yaml_path("Makefile"));
}
