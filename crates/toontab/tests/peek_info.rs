use std::io::Write;

use toontab::{info, peek, ParseOptions, PeekKind};

fn temp_doc(text: &str) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(text.as_bytes()).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn peek_object_collects_top_level_keys() {
    let f = temp_doc("# header comment\na: 1\nb:\n  c: 2\nd: 3\ne: 4\nf: 5\ng: 6\n");
    let p = peek(f.path(), 10).unwrap();
    assert_eq!(p.kind, PeekKind::Object);
    assert_eq!(p.first_keys, vec!["a", "b", "d", "e", "f"]);
    assert_eq!(p.preview.len(), 8);
}

#[test]
fn peek_detects_tabular_and_plain_arrays() {
    let f = temp_doc("[2]{a,b}:\n  1, 2\n");
    assert_eq!(peek(f.path(), 5).unwrap().kind, PeekKind::TabularArray);

    let f = temp_doc("[2]:\n  - 1\n");
    assert_eq!(peek(f.path(), 5).unwrap().kind, PeekKind::Array);

    let f = temp_doc("- 1\n- 2\n");
    assert_eq!(peek(f.path(), 5).unwrap().kind, PeekKind::Array);
}

#[test]
fn peek_limits_preview_lines() {
    let f = temp_doc("a: 1\nb: 2\nc: 3\n");
    let p = peek(f.path(), 2).unwrap();
    assert_eq!(p.preview, vec!["a: 1", "b: 2"]);
}

#[test]
fn info_counts_structures() {
    let doc = "\
users: [2]{id,name}:
  1, a
  2, b
tags: [2]:
  - 10
  - 20
meta:
  depth: 1
";
    let f = temp_doc(doc);
    let i = info(f.path(), &ParseOptions::default()).unwrap();
    // Root object, two row objects, and the meta block.
    assert_eq!(i.object_count, 4);
    assert_eq!(i.array_count, 2);
    assert!(i.has_tabular);
    assert_eq!(i.declared_rows, Some(2));
}

#[test]
fn info_without_tabular_content() {
    let f = temp_doc("a: 1\n");
    let i = info(f.path(), &ParseOptions::default()).unwrap();
    assert!(!i.has_tabular);
    assert_eq!(i.declared_rows, None);
    assert_eq!(i.array_count, 0);
    assert_eq!(i.object_count, 1);
}
