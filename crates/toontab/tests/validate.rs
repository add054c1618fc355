use std::io::Write;

use toontab::{validate_file, validate_str, ParseOptions};

#[test]
fn valid_document_passes() {
    let report = validate_str("a: 1\nb:\n  - 2\n", &ParseOptions::default());
    assert!(report.ok);
    assert!(report.error.is_none());
}

#[test]
fn invalid_document_reports_without_failing() {
    let report = validate_str("xs:\n  - bad value\n", &ParseOptions::default());
    assert!(!report.ok);
    let issue = report.error.unwrap();
    assert_eq!(issue.line, 2);
    assert!(issue.message.contains("invalid value"));
    assert_eq!(issue.snippet, "- bad value");
}

#[test]
fn snippet_is_truncated_to_sixty_characters() {
    let long = format!("bare {}\n", "x".repeat(100));
    let report = validate_str(&long, &ParseOptions::default());
    assert!(!report.ok);
    let issue = report.error.unwrap();
    assert_eq!(issue.snippet.chars().count(), 60);
    assert!(issue.snippet.ends_with("..."));
}

#[test]
fn file_validation_carries_the_path() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "\tbad: 1").unwrap();
    f.flush().unwrap();
    let report = validate_file(f.path(), &ParseOptions::default());
    assert!(!report.ok);
    let issue = report.error.unwrap();
    assert_eq!(issue.line, 1);
    assert_eq!(issue.file, f.path().display().to_string());
}

#[test]
fn lenient_validation_accepts_more() {
    let opts = ParseOptions {
        strict: false,
        ..ParseOptions::default()
    };
    assert!(validate_str("bare words here\n", &opts).ok);
}
