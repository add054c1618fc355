//! Marshaling between the codec's value tree and the serde ecosystem.
//!
//! Host value objects enter and leave the codec through these
//! conversions; the codec itself never depends on JSON semantics.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::encode::primitives::{date_string, timestamp_string};
use crate::number;
use crate::value::Value;

/// Convert a parsed tree into a `serde_json::Value`. Non-finite doubles
/// have no JSON representation and degrade to their display strings;
/// `Date`/`Timestamp` become their ISO strings.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Double(d) => serde_json::Number::from_f64(*d)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(d.to_string())),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Object(entries) => {
            let map = entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        Value::Date(days) => date_string(*days)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
        Value::Timestamp(secs) => timestamp_string(*secs)
            .map(serde_json::Value::String)
            .unwrap_or(serde_json::Value::Null),
    }
}

/// Convert a `serde_json::Value` into a tree. Integers outside the host
/// integer window become doubles, per the width rule of the data model.
pub fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                if number::parse_integer(&i.to_string()).is_some() {
                    return Value::Int(i);
                }
            }
            Value::Double(n.as_f64().unwrap_or(f64::NAN))
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Date(days) => match date_string(*days) {
                Some(s) => serializer.serialize_str(&s),
                None => serializer.serialize_unit(),
            },
            Value::Timestamp(secs) => match timestamp_string(*secs) {
                Some(s) => serializer.serialize_str(&s),
                None => serializer.serialize_unit(),
            },
        }
    }
}
