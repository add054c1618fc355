//! Recursive-descent DOM parser with one-line lookahead.

use std::path::Path;

use crate::decode::reader::BufferedReader;
use crate::decode::scanner::{self, Header, Line, LineKind};
use crate::error::{Error, Result, Warning, WarningCategory};
use crate::options::ParseOptions;
use crate::value::Value;

/// DOM parser. Reusable across inputs; warnings accumulate per parse and
/// are replaced on the next one.
pub struct Parser {
    opts: ParseOptions,
    warnings: Vec<Warning>,
    file: String,
    /// One-slot lookahead: the last classified line that did not belong
    /// to the current subtree.
    peeked: Option<Line>,
}

impl Parser {
    pub fn new(opts: ParseOptions) -> Self {
        Parser {
            opts,
            warnings: Vec::new(),
            file: String::new(),
            peeked: None,
        }
    }

    /// Warnings accumulated by the most recent parse.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Parse a complete document from memory. An empty document is `Null`.
    pub fn parse_str(&mut self, text: &str) -> Result<Value> {
        self.reset(String::new());
        let mut reader = BufferedReader::from_slice(text.as_bytes());
        let value = self.parse_value(&mut reader, -1)?;
        Ok(value.unwrap_or(Value::Null))
    }

    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<Value> {
        let path = path.as_ref();
        let display = path.display().to_string();
        self.reset(display.clone());
        let mut reader = BufferedReader::open(path).map_err(|e| e.with_file(&display))?;
        let value = self
            .parse_value(&mut reader, -1)
            .map_err(|e| e.with_file(&display))?;
        Ok(value.unwrap_or(Value::Null))
    }

    fn reset(&mut self, file: String) {
        self.warnings.clear();
        self.peeked = None;
        self.file = file;
    }

    /// Fetch the next non-empty, non-comment line, honouring the peek
    /// slot.
    fn next_line(&mut self, reader: &mut BufferedReader<'_>) -> Result<Option<Line>> {
        if let Some(line) = self.peeked.take() {
            return Ok(Some(line));
        }
        while let Some((raw, line_no)) = reader.next_line()? {
            let line = scanner::classify(raw, line_no, &self.opts)?;
            match line.kind {
                LineKind::Empty | LineKind::Comment => continue,
                _ => return Ok(Some(line)),
            }
        }
        Ok(None)
    }

    fn push_back(&mut self, line: Line) {
        debug_assert!(self.peeked.is_none());
        self.peeked = Some(line);
    }

    /// Parse the value nested under `parent_indent`. Returns `None` when
    /// the next line dedents out of the subtree (the line goes back to
    /// the peek slot) or at end of input.
    fn parse_value(
        &mut self,
        reader: &mut BufferedReader<'_>,
        parent_indent: isize,
    ) -> Result<Option<Value>> {
        let Some(line) = self.next_line(reader)? else {
            return Ok(None);
        };
        if line.indent as isize <= parent_indent {
            self.push_back(line);
            return Ok(None);
        }

        if matches!(
            line.kind,
            LineKind::KeyValue { .. } | LineKind::KeyNested { .. }
        ) {
            return self.parse_object(reader, parent_indent, line).map(Some);
        }
        if matches!(line.kind, LineKind::ListItem { .. }) {
            return self.parse_list(reader, parent_indent, line).map(Some);
        }

        let line_no = line.line_no;
        let raw = line.raw;
        match line.kind {
            LineKind::ArrayHeader(header) | LineKind::TabularHeader(header) => {
                self.parse_array(reader, parent_indent, &header).map(Some)
            }
            LineKind::RawValue { value } => {
                match scanner::scan_primitive(&value, self.opts.strict) {
                    Some(v) => Ok(Some(v)),
                    None if self.opts.strict => Err(Error::parse_at(
                        format!("invalid value: {value}"),
                        line_no,
                        &raw,
                        &self.file,
                    )),
                    None => Ok(Some(Value::String(value))),
                }
            }
            LineKind::Empty
            | LineKind::Comment
            | LineKind::ListItem { .. }
            | LineKind::KeyValue { .. }
            | LineKind::KeyNested { .. } => unreachable!(),
        }
    }

    /// Consume consecutive key-bearing lines at the indent of `first`.
    fn parse_object(
        &mut self,
        reader: &mut BufferedReader<'_>,
        parent_indent: isize,
        first: Line,
    ) -> Result<Value> {
        let obj_indent = first.indent;
        let mut entries: Vec<(String, Value)> = Vec::new();
        let mut repeats: Vec<(String, usize)> = Vec::new();

        let mut line = first;
        loop {
            self.parse_entry(reader, line, &mut entries, &mut repeats)?;

            let Some(next) = self.next_line(reader)? else {
                break;
            };
            let key_bearing = matches!(
                next.kind,
                LineKind::KeyValue { .. } | LineKind::KeyNested { .. }
            );
            if next.indent as isize <= parent_indent || next.indent != obj_indent || !key_bearing {
                self.push_back(next);
                break;
            }
            line = next;
        }

        if self.opts.warn && !repeats.is_empty() {
            let detail = repeats
                .iter()
                .map(|(key, count)| format!("{key} ({} times)", count + 1))
                .collect::<Vec<_>>()
                .join(", ");
            self.warnings.push(Warning::new(
                WarningCategory::DuplicateKey,
                format!("Duplicate keys found: {detail}"),
            ));
        }

        Ok(Value::Object(entries))
    }

    fn parse_entry(
        &mut self,
        reader: &mut BufferedReader<'_>,
        line: Line,
        entries: &mut Vec<(String, Value)>,
        repeats: &mut Vec<(String, usize)>,
    ) -> Result<()> {
        let (key, value) = match line.kind {
            LineKind::KeyValue { key, value } => {
                let v = match scanner::scan_primitive(&value, self.opts.strict) {
                    Some(v) => v,
                    None if value.starts_with('[') => {
                        match scanner::parse_array_header(&value) {
                            Some(header) => {
                                self.parse_array(reader, line.indent as isize, &header)?
                            }
                            None => Value::String(value),
                        }
                    }
                    None => Value::String(value),
                };
                (key, v)
            }
            LineKind::KeyNested { key } => {
                let v = self
                    .parse_value(reader, line.indent as isize)?
                    .unwrap_or(Value::Null);
                (key, v)
            }
            _ => unreachable!("parse_entry called on a non-key line"),
        };

        if let Some(pos) = entries.iter().position(|(k, _)| *k == key) {
            if !self.opts.allow_duplicate_keys {
                return Err(Error::parse_at(
                    format!("duplicate key: {key}"),
                    line.line_no,
                    &line.raw,
                    &self.file,
                ));
            }
            if self.opts.warn {
                match repeats.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, count)) => *count += 1,
                    None => repeats.push((key.clone(), 1)),
                }
            }
            // Last-wins: the repeated key moves to the end.
            entries.remove(pos);
        }
        entries.push((key, value));
        Ok(())
    }

    /// Consume consecutive list items at the indent of `first`.
    fn parse_list(
        &mut self,
        reader: &mut BufferedReader<'_>,
        parent_indent: isize,
        first: Line,
    ) -> Result<Value> {
        let item_indent = first.indent;
        let mut items = Vec::new();

        self.parse_list_item(reader, first, &mut items)?;
        loop {
            let Some(next) = self.next_line(reader)? else {
                break;
            };
            let is_item = matches!(next.kind, LineKind::ListItem { .. });
            if next.indent as isize <= parent_indent || next.indent != item_indent || !is_item {
                self.push_back(next);
                break;
            }
            self.parse_list_item(reader, next, &mut items)?;
        }
        Ok(Value::Array(items))
    }

    fn parse_list_item(
        &mut self,
        reader: &mut BufferedReader<'_>,
        line: Line,
        items: &mut Vec<Value>,
    ) -> Result<()> {
        let LineKind::ListItem { value } = line.kind else {
            unreachable!("parse_list_item called on a non-item line");
        };
        if value.is_empty() {
            let nested = self
                .parse_value(reader, line.indent as isize)?
                .unwrap_or(Value::Null);
            items.push(nested);
            return Ok(());
        }
        match scanner::scan_primitive(&value, self.opts.strict) {
            Some(v) => items.push(v),
            None if self.opts.strict => {
                return Err(Error::parse_at(
                    format!("invalid value: {value}"),
                    line.line_no,
                    &line.raw,
                    &self.file,
                ));
            }
            None => items.push(Value::String(value)),
        }
        Ok(())
    }

    /// Parse the body of an array header: list items for a plain header,
    /// delimiter-split rows for a tabular one.
    fn parse_array(
        &mut self,
        reader: &mut BufferedReader<'_>,
        parent_indent: isize,
        header: &Header,
    ) -> Result<Value> {
        let mut items = Vec::new();
        let mut item_indent: Option<usize> = None;

        loop {
            let Some(line) = self.next_line(reader)? else {
                break;
            };
            if line.indent as isize <= parent_indent {
                self.push_back(line);
                break;
            }
            let locked = *item_indent.get_or_insert(line.indent);
            if line.indent < locked {
                self.push_back(line);
                break;
            }

            if header.is_tabular() {
                items.push(self.parse_tabular_row(&line, header));
            } else {
                let is_item = line.indent == locked && matches!(line.kind, LineKind::ListItem { .. });
                if !is_item {
                    self.push_back(line);
                    break;
                }
                self.parse_list_item(reader, line, &mut items)?;
            }
        }

        if self.opts.warn && header.declared > 0 && items.len() != header.declared {
            let noun = if header.is_tabular() { "rows" } else { "items" };
            self.warnings.push(Warning::new(
                WarningCategory::NMismatch,
                format!(
                    "Declared [{}] but observed {} {noun}; using observed.",
                    header.declared,
                    items.len()
                ),
            ));
        }

        Ok(Value::Array(items))
    }

    /// Split a row and pair fields positionally with the header schema.
    /// Fields beyond the schema width are dropped; short rows simply omit
    /// the trailing keys.
    fn parse_tabular_row(&self, line: &Line, header: &Header) -> Value {
        let fields = scanner::split_row(&line.raw, header.delimiter);
        let mut row = Vec::with_capacity(header.fields.len());
        for (name, field) in header.fields.iter().zip(fields.iter()) {
            let value = match scanner::scan_primitive(field, self.opts.strict) {
                Some(v) => v,
                None => Value::String((*field).to_string()),
            };
            row.push((name.clone(), value));
        }
        Value::Object(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Value {
        Parser::new(ParseOptions::default()).parse_str(text).unwrap()
    }

    #[test]
    fn empty_document_is_null() {
        assert_eq!(parse(""), Value::Null);
        assert_eq!(parse("\n  \n# only a comment\n"), Value::Null);
    }

    #[test]
    fn scalar_document() {
        assert_eq!(parse("42"), Value::Int(42));
        assert_eq!(parse("\"x\""), Value::String("x".to_string()));
    }

    #[test]
    fn nested_object_under_key() {
        let v = parse("outer:\n  inner: 1\n");
        let inner = v.get("outer").unwrap();
        assert_eq!(inner.get("inner"), Some(&Value::Int(1)));
    }

    #[test]
    fn key_with_nothing_nested_is_null() {
        let v = parse("a:\nb: 2\n");
        assert_eq!(v.get("a"), Some(&Value::Null));
        assert_eq!(v.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn list_of_nested_objects() {
        let v = parse("-\n  a: 1\n-\n  a: 2\n");
        let items = v.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn empty_array_value_round_trips() {
        let v = parse("xs: [0]:\nnext: 1\n");
        assert_eq!(v.get("xs"), Some(&Value::Array(Vec::new())));
        assert_eq!(v.get("next"), Some(&Value::Int(1)));
    }
}
