//! Tabular arrays through the DOM parser: each row becomes an object.

use toontab::{parse_str, ParseOptions, Value};

fn parse(text: &str) -> Value {
    parse_str(text, &ParseOptions::default()).unwrap()
}

#[test]
fn rows_pair_fields_with_header_names() {
    let doc = "\
users: [2]{id,name,score}:
  1, Ada, 99.5
  2, \"Ken, Jr.\", null
";
    let v = parse(doc);
    let rows = v.get("users").unwrap().as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id"), Some(&Value::Int(1)));
    assert_eq!(rows[0].get("name"), Some(&Value::String("Ada".to_string())));
    assert_eq!(rows[0].get("score"), Some(&Value::Double(99.5)));
    assert_eq!(
        rows[1].get("name"),
        Some(&Value::String("Ken, Jr.".to_string()))
    );
    assert_eq!(rows[1].get("score"), Some(&Value::Null));
}

#[test]
fn top_level_tabular_header() {
    let doc = "\
[2]{a,b}:
  1, 2
  3, 4
";
    let v = parse(doc);
    let rows = v.as_array().unwrap();
    assert_eq!(rows[1].get("b"), Some(&Value::Int(4)));
}

#[test]
fn short_rows_omit_trailing_fields() {
    let doc = "t: [1]{a,b,c}:\n  1, 2\n";
    let v = parse(doc);
    let rows = v.get("t").unwrap().as_array().unwrap();
    assert_eq!(rows[0].get("a"), Some(&Value::Int(1)));
    assert_eq!(rows[0].get("b"), Some(&Value::Int(2)));
    assert_eq!(rows[0].get("c"), None);
}

#[test]
fn table_ends_at_dedent() {
    let doc = "\
t: [1]{a,b}:
  1, 2
after: 9
";
    let v = parse(doc);
    assert_eq!(v.get("t").unwrap().as_array().unwrap().len(), 1);
    assert_eq!(v.get("after"), Some(&Value::Int(9)));
}
