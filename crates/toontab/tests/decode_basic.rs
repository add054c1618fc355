use toontab::{parse_str, ParseOptions, Value};

fn parse(text: &str) -> Value {
    parse_str(text, &ParseOptions::default()).unwrap()
}

#[test]
fn object_with_nested_list() {
    let doc = "\
name: Ada
born: 1815
flags: [2]:
  - true
  - false
";
    let v = parse(doc);
    assert_eq!(
        v,
        Value::Object(vec![
            ("name".to_string(), Value::String("Ada".to_string())),
            ("born".to_string(), Value::Int(1815)),
            (
                "flags".to_string(),
                Value::Array(vec![Value::Bool(true), Value::Bool(false)])
            ),
        ])
    );
}

#[test]
fn crlf_and_lf_parse_identically() {
    let lf = "a: 1\nb:\n  - true\n";
    let crlf = "a: 1\r\nb:\r\n  - true\r\n";
    assert_eq!(parse(lf), parse(crlf));
}

#[test]
fn whitespace_only_lines_are_skipped() {
    let doc = "a: 1\n   \n\nb: 2\n";
    let v = parse(doc);
    assert_eq!(v.get("a"), Some(&Value::Int(1)));
    assert_eq!(v.get("b"), Some(&Value::Int(2)));
}

#[test]
fn comments_are_skipped_and_stripped() {
    let doc = "\
# leading comment
a: 1 # trailing
// another comment
b: ok // tail
";
    let v = parse(doc);
    assert_eq!(v.get("a"), Some(&Value::Int(1)));
    assert_eq!(v.get("b"), Some(&Value::String("ok".to_string())));
}

#[test]
fn hash_without_preceding_whitespace_stays() {
    let v = parse("a: x#y\n");
    assert_eq!(v.get("a"), Some(&Value::String("x#y".to_string())));
}

#[test]
fn comments_disabled_keeps_hash_lines() {
    let opts = ParseOptions {
        allow_comments: false,
        strict: false,
        ..ParseOptions::default()
    };
    let v = parse_str("a: 1 # not a comment\n", &opts).unwrap();
    assert_eq!(
        v.get("a"),
        Some(&Value::String("1 # not a comment".to_string()))
    );
}

#[test]
fn quoted_keys_and_strings_unescape() {
    let doc = "\"a:b\": \"line\\nbreak\"\n";
    let v = parse(doc);
    assert_eq!(
        v.get("a:b"),
        Some(&Value::String("line\nbreak".to_string()))
    );
}

#[test]
fn unicode_escape_decodes_to_utf8() {
    let v = parse("s: \"caf\\u00e9\"\n");
    assert_eq!(v.get("s"), Some(&Value::String("café".to_string())));
}

#[test]
fn deep_nesting() {
    let doc = "\
a:
  b:
    c: 3
  d: 4
e: 5
";
    let v = parse(doc);
    let a = v.get("a").unwrap();
    let b = a.get("b").unwrap();
    assert_eq!(b.get("c"), Some(&Value::Int(3)));
    assert_eq!(a.get("d"), Some(&Value::Int(4)));
    assert_eq!(v.get("e"), Some(&Value::Int(5)));
}

#[test]
fn mixed_number_widths() {
    let doc = "\
small: 12
wide: 5000000000
frac: 3.5
exp: 1e3
neg: -7
";
    let v = parse(doc);
    assert_eq!(v.get("small"), Some(&Value::Int(12)));
    assert_eq!(v.get("wide"), Some(&Value::Double(5_000_000_000.0)));
    assert_eq!(v.get("frac"), Some(&Value::Double(3.5)));
    assert_eq!(v.get("exp"), Some(&Value::Double(1000.0)));
    assert_eq!(v.get("neg"), Some(&Value::Int(-7)));
}

#[test]
fn integer_na_sentinel_parses_as_double() {
    let v = parse("x: -2147483648\n");
    assert_eq!(v.get("x"), Some(&Value::Double(-2147483648.0)));
}

#[test]
fn list_with_promoted_element_types() {
    let v = parse("v: [3]:\n  - 1\n  - 2\n  - 3.5\n");
    assert_eq!(
        v.get("v"),
        Some(&Value::Array(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Double(3.5)
        ]))
    );
}
