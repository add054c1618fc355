use std::io::Write;
use std::process::{Command, Stdio};

fn run(args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_toontab"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn toontab");
    child
        .stdin
        .as_mut()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let out = child.wait_with_output().unwrap();
    (
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
        out.status.success(),
    )
}

#[test]
fn decodes_toon_to_json() {
    let (stdout, _stderr, ok) = run(&[], "a: 1\nb: true\n");
    assert!(ok);
    assert_eq!(stdout.trim(), r#"{"a":1,"b":true}"#);
}

#[test]
fn encodes_json_to_toon() {
    let (stdout, _stderr, ok) = run(&["--encode"], r#"{"a": 1}"#);
    assert!(ok);
    assert_eq!(stdout, "a: 1\n");
}

#[test]
fn validate_reports_line() {
    let (_stdout, stderr, ok) = run(&["--validate"], "a: 1\n\t bad\n");
    assert!(!ok);
    assert!(stderr.contains("line 2"));
}

#[test]
fn format_canonical_sorts_keys() {
    let (stdout, _stderr, ok) = run(&["--format", "--canonical"], "b: 1\na: 2\n");
    assert!(ok);
    assert_eq!(stdout, "a: 2\nb: 1\n");
}
