//! Line classification and primitive scanning.

use crate::error::{Error, Result};
use crate::number;
use crate::options::ParseOptions;
use crate::value::Value;

/// A classified input line. `raw` keeps the comment-stripped body after
/// indentation for consumers that re-split it (tabular rows).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    pub line_no: usize,
    pub indent: usize,
    pub kind: LineKind,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LineKind {
    Empty,
    Comment,
    /// `- value`; an empty value means the element continues on nested
    /// lines.
    ListItem { value: String },
    KeyValue { key: String, value: String },
    KeyNested { key: String },
    ArrayHeader(Header),
    TabularHeader(Header),
    RawValue { value: String },
}

/// Parsed `[N]` / `[N]{f1,f2,...}` bracket form.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Header {
    /// Declared element or row count; 0 means unspecified.
    pub declared: usize,
    /// Field names; empty for plain array headers.
    pub fields: Vec<String>,
    pub delimiter: char,
}

impl Header {
    pub fn is_tabular(&self) -> bool {
        !self.fields.is_empty()
    }
}

pub(crate) fn classify(line: &str, line_no: usize, opts: &ParseOptions) -> Result<Line> {
    let indent = count_indent(line, line_no, opts.strict)?;
    let body: &str = &line[byte_len_of_indent(line, indent)..];

    if body.trim().is_empty() {
        return Ok(Line {
            line_no,
            indent,
            kind: LineKind::Empty,
            raw: String::new(),
        });
    }

    if opts.allow_comments && is_comment(body.trim_start()) {
        return Ok(Line {
            line_no,
            indent,
            kind: LineKind::Comment,
            raw: String::new(),
        });
    }

    let body = if opts.allow_comments {
        strip_trailing_comment(body)
    } else {
        body.trim_end()
    };
    let raw = body.to_string();

    if let Some(rest) = body.strip_prefix("- ") {
        return Ok(Line {
            line_no,
            indent,
            kind: LineKind::ListItem {
                value: rest.trim().to_string(),
            },
            raw,
        });
    }
    if body == "-" {
        return Ok(Line {
            line_no,
            indent,
            kind: LineKind::ListItem {
                value: String::new(),
            },
            raw,
        });
    }

    if body.starts_with('[') {
        match parse_array_header(body) {
            Some(header) => {
                let kind = if header.is_tabular() {
                    LineKind::TabularHeader(header)
                } else {
                    LineKind::ArrayHeader(header)
                };
                return Ok(Line {
                    line_no,
                    indent,
                    kind,
                    raw,
                });
            }
            None if opts.strict => {
                return Err(Error::parse(format!("invalid array header: {body}"), line_no));
            }
            None => {
                return Ok(Line {
                    line_no,
                    indent,
                    kind: LineKind::RawValue {
                        value: body.trim().to_string(),
                    },
                    raw,
                });
            }
        }
    }

    if let Some(colon) = find_unquoted_colon(body) {
        let key_part = body[..colon].trim();
        let after = body[colon + 1..].trim();
        let key = decode_key(key_part);
        let kind = if after.is_empty() {
            LineKind::KeyNested { key }
        } else {
            LineKind::KeyValue {
                key,
                value: after.to_string(),
            }
        };
        return Ok(Line {
            line_no,
            indent,
            kind,
            raw,
        });
    }

    Ok(Line {
        line_no,
        indent,
        kind: LineKind::RawValue {
            value: body.trim().to_string(),
        },
        raw,
    })
}

/// Count leading indentation columns. A TAB is rejected in strict mode
/// and otherwise counted as one column.
pub(crate) fn count_indent(line: &str, line_no: usize, strict: bool) -> Result<usize> {
    let mut indent = 0;
    for b in line.bytes() {
        match b {
            b' ' => indent += 1,
            b'\t' => {
                if strict {
                    return Err(Error::parse(
                        "tab characters not allowed in indentation",
                        line_no,
                    ));
                }
                indent += 1;
            }
            _ => break,
        }
    }
    Ok(indent)
}

fn byte_len_of_indent(line: &str, indent: usize) -> usize {
    // Indentation bytes are all ASCII (space or tab), one byte per column.
    indent.min(line.len())
}

pub(crate) fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#') || trimmed.starts_with("//")
}

/// Remove a trailing `#` or `//` comment that is preceded by whitespace
/// and not inside a quoted string, then trim trailing whitespace.
pub(crate) fn strip_trailing_comment(body: &str) -> &str {
    let bytes = body.as_bytes();
    let mut in_string = false;
    let mut escape = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if escape {
            escape = false;
            i += 1;
            continue;
        }
        if in_string && b == b'\\' {
            escape = true;
            i += 1;
            continue;
        }
        if b == b'"' {
            in_string = !in_string;
            i += 1;
            continue;
        }
        if !in_string && i > 0 && bytes[i - 1].is_ascii_whitespace() {
            let is_hash = b == b'#';
            let is_slashes = b == b'/' && bytes.get(i + 1) == Some(&b'/');
            if is_hash || is_slashes {
                return body[..i].trim_end();
            }
        }
        i += 1;
    }
    body.trim_end()
}

/// Find the first `:` not inside a double-quoted span.
pub(crate) fn find_unquoted_colon(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut in_string = false;
    let mut escape = false;
    for (i, &b) in bytes.iter().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if in_string && b == b'\\' {
            escape = true;
            continue;
        }
        match b {
            b'"' => in_string = !in_string,
            b':' if !in_string => return Some(i),
            _ => {}
        }
    }
    None
}

fn decode_key(key: &str) -> String {
    if key.len() >= 2 && key.starts_with('"') && key.ends_with('"') {
        if let Some(unescaped) = unescape_quoted(key) {
            return unescaped;
        }
        return key[1..key.len() - 1].to_string();
    }
    key.to_string()
}

/// Parse a `[N]` / `[N]{fields}` bracket form, optionally terminated by
/// `:`. Returns `None` when the form is malformed.
pub(crate) fn parse_array_header(text: &str) -> Option<Header> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }
    let mut pos = 1;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let declared = if pos > 1 {
        text[1..pos].parse::<usize>().ok()?
    } else {
        0
    };
    if bytes.get(pos) != Some(&b']') {
        return None;
    }
    pos += 1;

    let mut fields = Vec::new();
    if bytes.get(pos) == Some(&b'{') {
        let close = text[pos..].find('}').map(|i| pos + i)?;
        for field in text[pos + 1..close].split(',') {
            let field = field.trim();
            if !field.is_empty() {
                fields.push(field.to_string());
            }
        }
        if fields.is_empty() {
            return None;
        }
        pos = close + 1;
    }

    let rest = text[pos..].trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    if !rest.trim().is_empty() {
        return None;
    }

    Some(Header {
        declared,
        fields,
        delimiter: ',',
    })
}

/// Scan a primitive literal. `None` means the text is not a recognised
/// primitive; the caller decides between a strict failure and an
/// unquoted-string fallback.
pub(crate) fn scan_primitive(text: &str, strict: bool) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match text {
        "null" => return Some(Value::Null),
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if text.starts_with('"') {
        return unescape_quoted(text).map(Value::String);
    }
    if let Some(i) = number::parse_integer(text) {
        return Some(Value::Int(i));
    }
    if let Some(d) = number::parse_double(text) {
        if strict && !d.is_finite() {
            return None;
        }
        return Some(Value::Double(d));
    }
    None
}

/// Decode a double-quoted literal with the escapes
/// `\" \\ \n \r \t \uXXXX` (BMP only). Returns `None` on malformed input.
pub(crate) fn unescape_quoted(text: &str) -> Option<String> {
    if text.len() < 2 || !text.starts_with('"') || !text.ends_with('"') {
        return None;
    }
    let inner = &text[1..text.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            if ch == '"' {
                // An unescaped quote means the literal ended early.
                return None;
            }
            out.push(ch);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    code = (code << 4) | chars.next()?.to_digit(16)?;
                }
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Split a tabular row on `delimiter`, honouring double-quoted fields and
/// backslash escapes. Fields are trimmed; empty fields are kept.
pub(crate) fn split_row(line: &str, delimiter: char) -> Vec<&str> {
    let bytes = line.as_bytes();
    let delim = delimiter as u8;
    let mut fields = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if escape {
            escape = false;
            continue;
        }
        if in_string && b == b'\\' {
            escape = true;
            continue;
        }
        if b == b'"' {
            in_string = !in_string;
            continue;
        }
        if !in_string && b == delim {
            fields.push(line[start..i].trim());
            start = i + 1;
        }
    }
    fields.push(line[start..].trim());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_default(line: &str) -> Line {
        classify(line, 1, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn classifies_kinds() {
        assert_eq!(classify_default("").kind, LineKind::Empty);
        assert_eq!(classify_default("   ").kind, LineKind::Empty);
        assert_eq!(classify_default("# note").kind, LineKind::Comment);
        assert_eq!(classify_default("// note").kind, LineKind::Comment);
        assert_eq!(
            classify_default("  - true").kind,
            LineKind::ListItem {
                value: "true".to_string()
            }
        );
        assert_eq!(
            classify_default("a: 1").kind,
            LineKind::KeyValue {
                key: "a".to_string(),
                value: "1".to_string()
            }
        );
        assert_eq!(
            classify_default("a:").kind,
            LineKind::KeyNested {
                key: "a".to_string()
            }
        );
        assert_eq!(
            classify_default("42").kind,
            LineKind::RawValue {
                value: "42".to_string()
            }
        );
    }

    #[test]
    fn header_forms() {
        let h = parse_array_header("[3]:").unwrap();
        assert_eq!(h.declared, 3);
        assert!(!h.is_tabular());

        let h = parse_array_header("[2]{id,name}:").unwrap();
        assert_eq!(h.declared, 2);
        assert_eq!(h.fields, vec!["id", "name"]);

        let h = parse_array_header("[]:").unwrap();
        assert_eq!(h.declared, 0);

        assert!(parse_array_header("[x]:").is_none());
        assert!(parse_array_header("[2] trailing").is_none());
        assert!(parse_array_header("[2]{}:").is_none());
    }

    #[test]
    fn colon_inside_quotes_is_not_a_separator() {
        assert_eq!(find_unquoted_colon(r#""a:b" rest"#), None);
        assert_eq!(find_unquoted_colon(r#""a:b": 1"#), Some(5));
    }

    #[test]
    fn trailing_comment_needs_preceding_whitespace() {
        assert_eq!(strip_trailing_comment("a 1 # note"), "a 1");
        assert_eq!(strip_trailing_comment("a 1 // note"), "a 1");
        assert_eq!(strip_trailing_comment("a#b"), "a#b");
        assert_eq!(strip_trailing_comment("\"x # y\" tail"), "\"x # y\" tail");
    }

    #[test]
    fn primitives() {
        assert_eq!(scan_primitive("null", true), Some(Value::Null));
        assert_eq!(scan_primitive("true", true), Some(Value::Bool(true)));
        assert_eq!(scan_primitive("12", true), Some(Value::Int(12)));
        assert_eq!(scan_primitive("1.5", true), Some(Value::Double(1.5)));
        assert_eq!(
            scan_primitive("\"a\\nb\"", true),
            Some(Value::String("a\nb".to_string()))
        );
        assert_eq!(scan_primitive("hello", true), None);
        // The host integer NA sentinel falls through to the double branch.
        assert_eq!(
            scan_primitive("-2147483648", true),
            Some(Value::Double(-2147483648.0))
        );
    }

    #[test]
    fn unicode_escape_is_bmp_only() {
        assert_eq!(unescape_quoted("\"\\u0041\""), Some("A".to_string()));
        assert_eq!(unescape_quoted("\"\\u00e9\""), Some("é".to_string()));
        // Lone surrogates are not representable.
        assert_eq!(unescape_quoted("\"\\ud800\""), None);
    }

    #[test]
    fn split_row_respects_quotes() {
        assert_eq!(split_row("1, 2, 3", ','), vec!["1", "2", "3"]);
        assert_eq!(
            split_row("2, \"Ken, Jr.\", null", ','),
            vec!["2", "\"Ken, Jr.\"", "null"]
        );
        assert_eq!(split_row("1,,3", ','), vec!["1", "", "3"]);
    }

    #[test]
    fn strict_rejects_tab_indent() {
        let opts = ParseOptions::default();
        assert!(classify("\ta: 1", 1, &opts).is_err());
        let lenient = ParseOptions {
            strict: false,
            ..ParseOptions::default()
        };
        let line = classify("\ta: 1", 1, &lenient).unwrap();
        assert_eq!(line.indent, 1);
    }
}
