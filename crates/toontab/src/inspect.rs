//! Lightweight file inspection: a bounded preview and whole-document
//! structure counts.

use std::path::Path;

use crate::decode::reader::BufferedReader;
use crate::decode::scanner;
use crate::decode::Parser;
use crate::error::Result;
use crate::options::ParseOptions;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeekKind {
    Object,
    Array,
    TabularArray,
    Unknown,
}

/// Shallow look at a file: top-level shape, up to five top-level keys,
/// and the first lines verbatim.
#[derive(Debug, Clone)]
pub struct Peek {
    pub kind: PeekKind,
    pub first_keys: Vec<String>,
    pub preview: Vec<String>,
}

/// Read at most `n_lines` lines and classify the top-level shape without
/// parsing the document.
pub fn peek(path: impl AsRef<Path>, n_lines: usize) -> Result<Peek> {
    let mut reader = BufferedReader::open(path)?;
    let mut preview = Vec::new();
    let mut kind = PeekKind::Unknown;
    let mut first_keys = Vec::new();

    while preview.len() < n_lines {
        let Some((line, _no)) = reader.next_line()? else {
            break;
        };
        preview.push(line.to_string());

        let trimmed = line.trim();
        if trimmed.is_empty() || scanner::is_comment(trimmed) {
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        if kind == PeekKind::Unknown {
            kind = match trimmed.as_bytes()[0] {
                b'[' if trimmed.contains('{') => PeekKind::TabularArray,
                b'[' => PeekKind::Array,
                b'-' => PeekKind::Array,
                _ => match scanner::find_unquoted_colon(trimmed) {
                    Some(colon) => {
                        push_key(&mut first_keys, trimmed[..colon].trim());
                        PeekKind::Object
                    }
                    None => PeekKind::Unknown,
                },
            };
        } else if kind == PeekKind::Object && indent == 0 && first_keys.len() < 5 {
            if let Some(colon) = scanner::find_unquoted_colon(trimmed) {
                push_key(&mut first_keys, trimmed[..colon].trim());
            }
        }
    }

    Ok(Peek {
        kind,
        first_keys,
        preview,
    })
}

fn push_key(keys: &mut Vec<String>, key: &str) {
    if !key.is_empty() && keys.len() < 5 {
        keys.push(key.to_string());
    }
}

/// Whole-document structure summary computed over the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub array_count: usize,
    pub object_count: usize,
    pub has_tabular: bool,
    /// Row count of the first tabular-shaped array, when any.
    pub declared_rows: Option<usize>,
}

pub fn info(path: impl AsRef<Path>, opts: &ParseOptions) -> Result<Info> {
    let value = Parser::new(opts.clone()).parse_file(path)?;
    let mut info = Info {
        array_count: 0,
        object_count: 0,
        has_tabular: false,
        declared_rows: None,
    };
    count_nodes(&value, &mut info);
    Ok(info)
}

fn count_nodes(value: &Value, info: &mut Info) {
    match value {
        Value::Array(items) => {
            info.array_count += 1;
            let tabular =
                !items.is_empty() && items.iter().all(|i| matches!(i, Value::Object(_)));
            if tabular && !info.has_tabular {
                info.has_tabular = true;
                info.declared_rows = Some(items.len());
            }
            for item in items {
                count_nodes(item, info);
            }
        }
        Value::Object(entries) => {
            info.object_count += 1;
            for (_, v) in entries {
                count_nodes(v, info);
            }
        }
        _ => {}
    }
}
