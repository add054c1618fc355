use toontab::{encode, parse_str, EncodeOptions, ParseOptions, Value};

fn obj(entries: Vec<(&str, Value)>) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    )
}

fn round_trip(value: &Value) -> Value {
    let text = encode(value, &EncodeOptions::default()).unwrap();
    parse_str(&text, &ParseOptions::default()).unwrap()
}

#[test]
fn trees_survive_encode_parse() {
    let tree = obj(vec![
        ("name", Value::String("Ada".to_string())),
        ("born", Value::Int(1815)),
        ("rating", Value::Double(0.25)),
        ("missing", Value::Null),
        (
            "tags",
            Value::Array(vec![
                Value::String("pioneer".to_string()),
                Value::String("with, comma".to_string()),
            ]),
        ),
        (
            "nested",
            obj(vec![(
                "inner",
                Value::Array(vec![Value::Array(vec![Value::Int(1)]), Value::Null]),
            )]),
        ),
    ]);
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn strings_that_look_like_literals_stay_strings() {
    let tree = obj(vec![
        ("a", Value::String("true".to_string())),
        ("b", Value::String("123".to_string())),
        ("c", Value::String("null".to_string())),
    ]);
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn empty_array_survives() {
    let tree = obj(vec![("xs", Value::Array(vec![]))]);
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn canonical_encoding_is_idempotent() {
    let canonical = EncodeOptions {
        canonical: true,
        ..EncodeOptions::default()
    };
    let tree = obj(vec![
        ("zeta", Value::Array(vec![Value::Int(3), Value::Double(0.5)])),
        ("alpha", obj(vec![("b", Value::Int(1)), ("a", Value::Int(2))])),
        ("Mid", Value::String("x".to_string())),
    ]);
    let once = encode(&tree, &canonical).unwrap();
    let again = encode(
        &parse_str(&once, &ParseOptions::default()).unwrap(),
        &canonical,
    )
    .unwrap();
    assert_eq!(once, again);
    // Byte-lexicographic order puts uppercase first.
    assert!(once.starts_with("Mid:"));
}

#[test]
fn escaped_content_survives() {
    let tree = obj(vec![(
        "s",
        Value::String("line\nbreak \"quoted\" tab\t#hash".to_string()),
    )]);
    assert_eq!(round_trip(&tree), tree);
}

#[test]
fn wide_int_becomes_double_on_reparse() {
    // Width decisions are the one sanctioned divergence: an i64 outside
    // the host integer window reads back as a double.
    let tree = obj(vec![("wide", Value::Int(5_000_000_000))]);
    let back = round_trip(&tree);
    assert_eq!(back.get("wide"), Some(&Value::Double(5_000_000_000.0)));
}
