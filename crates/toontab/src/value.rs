//! The in-memory value tree produced by the parser and consumed by the
//! encoder.

/// A parsed TOON value.
///
/// `Int` is only used for literals that fit the host integer window
/// `(i32::MIN, i32::MAX]`; wider integers and anything with a decimal
/// point or exponent become `Double`. Objects preserve insertion order.
///
/// `Date` and `Timestamp` are encoder-boundary tags: the parser never
/// produces them, but the encoder renders them as quoted ISO strings
/// (`"YYYY-MM-DD"` and `"YYYY-MM-DDTHH:MM:SSZ"`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
    /// Days since 1970-01-01.
    Date(i64),
    /// Seconds since the epoch, UTC.
    Timestamp(i64),
}

impl Value {
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, Value)]> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key in an object. Keys are unique after duplicate
    /// resolution, so the first match is the only match.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
