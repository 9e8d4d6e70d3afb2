//! Tests for lint mode.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use yam::format::FormatOptions;
use yam::lint::{lint_paths, DiffHandler, UnifiedDiff};
use yam::Error;

/// Records every diff it is handed.
#[derive(Default)]
struct Recorder {
    diffs: Vec<(PathBuf, String, String)>,
}

impl DiffHandler for Recorder {
    fn handle(&mut self, path: &Path, want: &[u8], got: &[u8]) -> io::Result<()> {
        self.diffs.push((
            path.to_path_buf(),
            String::from_utf8_lossy(want).into_owned(),
            String::from_utf8_lossy(got).into_owned(),
        ));
        Ok(())
    }
}

#[test]
fn test_lint_passes_formatted_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("ok.yaml"), "a: 1\nb:\n  - x\n").unwrap();

    let mut recorder = Recorder::default();
    lint_paths(&[dir.path().to_path_buf()], &FormatOptions::default(), &mut recorder).unwrap();
    assert!(recorder.diffs.is_empty());
}

#[test]
fn test_lint_reports_unformatted_files() {
    let dir = TempDir::new().unwrap();
    let ok = dir.path().join("ok.yaml");
    let bad = dir.path().join("bad.yaml");
    fs::write(&ok, "a: 1\n").unwrap();
    fs::write(&bad, "a:     1\n").unwrap();

    let mut recorder = Recorder::default();
    let result = lint_paths(&[ok, bad.clone()], &FormatOptions::default(), &mut recorder);

    match result {
        Err(Error::LintFailed { paths }) => assert_eq!(paths, vec![bad.clone()]),
        other => panic!("expected LintFailed, got {:?}", other),
    }
    assert_eq!(
        recorder.diffs,
        vec![(bad.clone(), "a: 1\n".to_string(), "a:     1\n".to_string())]
    );
    // Lint never writes.
    assert_eq!(fs::read_to_string(&bad).unwrap(), "a:     1\n");
}

#[test]
fn test_lint_skips_non_yaml_files() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "not:    formatted\n").unwrap();

    let mut recorder = Recorder::default();
    lint_paths(&[notes], &FormatOptions::default(), &mut recorder).unwrap();
    assert!(recorder.diffs.is_empty());
}

#[test]
fn test_lint_aborts_on_parse_error() {
    let dir = TempDir::new().unwrap();
    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "a: {b\n").unwrap();

    let mut recorder = Recorder::default();
    let result = lint_paths(&[broken], &FormatOptions::default(), &mut recorder);
    assert!(matches!(result, Err(Error::Decode { origin: Some(_), .. })));
}

#[test]
fn test_unified_diff_handler() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gap.yaml");
    fs::write(&path, "a: 1\nb: 2\n").unwrap();

    let options: FormatOptions = serde_yaml::from_str("gap: [.]\n").unwrap();
    let mut handler = UnifiedDiff::new(Vec::new());
    let result = lint_paths(&[path], &options, &mut handler);
    assert!(matches!(result, Err(Error::LintFailed { .. })));

    let output = String::from_utf8(handler.into_inner()).unwrap();
    assert!(output.starts_with("--- want\n+++ got\n@@ "));
    assert!(output.contains(" a: 1\n-\n b: 2\n"));
    assert!(output.ends_with("\n\n"));
}
