//! Streams with more than one document, and edge-case streams.

use pretty_assertions::assert_eq;
use yam::document::{parse_documents, NodeKind};
use yam::format::{apply, FormatOptions};

fn format(source: &str) -> String {
    String::from_utf8(apply(source.as_bytes(), &FormatOptions::default()).unwrap()).unwrap()
}

#[test]
fn test_parse_multiple_documents() {
    let documents = parse_documents("a: 1\n---\n- x\n---\nplain\n").unwrap();
    assert_eq!(documents.len(), 3);
    assert!(documents.iter().all(|doc| doc.kind == NodeKind::Document));
    assert_eq!(documents[0].children[0].kind, NodeKind::Mapping);
    assert_eq!(documents[1].children[0].kind, NodeKind::Sequence);
    assert_eq!(documents[2].children[0].kind, NodeKind::Scalar);
}

#[test]
fn test_separators_between_documents() {
    assert_eq!(format("a: 1\n---\nb:   2\n"), "a: 1\n---\nb: 2\n");
    assert_eq!(
        format("---\na: 1\n---\nb: 2\n---\nc: 3\n"),
        "---\na: 1\n---\nb: 2\n---\nc: 3\n"
    );
}

#[test]
fn test_document_comments() {
    let source = "# first\n---\na: 1\n# end of first\n---\nb: 2\n";
    let documents = parse_documents(source).unwrap();
    assert_eq!(documents[0].comments.head.as_deref(), Some("# first"));
    assert_eq!(documents[0].comments.foot.as_deref(), Some("# end of first"));
    assert_eq!(format(source), source);
}

#[test]
fn test_rules_apply_per_document() {
    let options: FormatOptions = serde_yaml::from_str("sort: [.list]\n").unwrap();
    let output = apply(b"list: [b, a]\n---\nlist: [d, c]\n", &options).unwrap();
    assert_eq!(output, b"list: [a, b]\n---\nlist: [c, d]\n");
}

#[test]
fn test_scalar_documents() {
    assert_eq!(format("hello\n"), "hello\n");
    assert_eq!(format("'quoted'\n"), "'quoted'\n");
}

#[test]
fn test_empty_and_comment_only_streams() {
    assert_eq!(format(""), "");
    assert_eq!(format("# only a comment\n"), "# only a comment\n");
}

#[test]
fn test_idempotent_stream() {
    let source = "# a\nx: [1, 2]\n---\n- one\n- two: 2\n---\nkey: |\n  text\n";
    let once = format(source);
    assert_eq!(format(&once), once);
}
