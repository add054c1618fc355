//! Tree-to-text emission, including the tabular writer.

pub(crate) mod primitives;
pub mod stream;
pub(crate) mod writer;

use std::fs;
use std::path::Path;

use crate::encode::writer::WriteBuffer;
use crate::error::Result;
use crate::options::EncodeOptions;
use crate::table::{Column, ColumnData, Table};
use crate::value::Value;

pub use stream::StreamWriter;

/// Emits a [`Value`] tree or a [`Table`] as TOON text.
pub struct Encoder {
    opts: EncodeOptions,
}

impl Encoder {
    pub fn new(opts: EncodeOptions) -> Self {
        Encoder { opts }
    }

    pub fn encode(&self, value: &Value) -> Result<String> {
        let mut buf = WriteBuffer::new();
        match value {
            Value::Array(items) => self.write_array(&mut buf, items, 0)?,
            Value::Object(entries) => self.write_object(&mut buf, entries, 0)?,
            scalar => self.write_scalar(&mut buf, scalar)?,
        }
        Ok(buf.into_string())
    }

    /// Emit a columnar table as `[N]{f1,f2,...}:` plus one row per line.
    pub fn encode_table(&self, table: &Table) -> Result<String> {
        let mut buf = WriteBuffer::new();
        self.write_table(&mut buf, table)?;
        Ok(buf.into_string())
    }

    fn newline(&self, buf: &mut WriteBuffer) {
        if self.opts.pretty {
            buf.push('\n');
        }
    }

    fn indent(&self, buf: &mut WriteBuffer, depth: usize) {
        if self.opts.pretty {
            buf.indent(depth * self.opts.indent);
        }
    }

    fn write_scalar(&self, buf: &mut WriteBuffer, value: &Value) -> Result<()> {
        match value {
            Value::Null => primitives::write_null(buf),
            Value::Bool(b) => primitives::write_bool(buf, *b),
            Value::Int(i) => buf.push_str(&i.to_string()),
            Value::Double(d) => primitives::write_double(buf, *d, self.opts.strict)?,
            Value::String(s) => buf.push_escaped(s),
            Value::Date(days) => primitives::write_date(buf, *days),
            Value::Timestamp(secs) => primitives::write_timestamp(buf, *secs),
            Value::Array(_) | Value::Object(_) => unreachable!("write_scalar on a container"),
        }
        Ok(())
    }

    /// `[N]:` header line, then one `- ` item per line one step deeper.
    /// Nested containers put the dash alone and the block below it.
    fn write_array(&self, buf: &mut WriteBuffer, items: &[Value], depth: usize) -> Result<()> {
        self.indent(buf, depth);
        buf.push_str(&format!("[{}]:", items.len()));
        self.newline(buf);
        self.write_array_items(buf, items, depth + 1)
    }

    fn write_array_items(
        &self,
        buf: &mut WriteBuffer,
        items: &[Value],
        depth: usize,
    ) -> Result<()> {
        for item in items {
            self.indent(buf, depth);
            if item.is_scalar() {
                buf.push_str("- ");
                self.write_scalar(buf, item)?;
                self.newline(buf);
            } else {
                buf.push('-');
                self.newline(buf);
                match item {
                    Value::Array(nested) => self.write_array(buf, nested, depth + 1)?,
                    Value::Object(entries) => self.write_object(buf, entries, depth + 1)?,
                    _ => unreachable!(),
                }
            }
        }
        Ok(())
    }

    fn write_object(
        &self,
        buf: &mut WriteBuffer,
        entries: &[(String, Value)],
        depth: usize,
    ) -> Result<()> {
        let mut sorted;
        let entries = if self.opts.canonical {
            sorted = entries.to_vec();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            &sorted[..]
        } else {
            entries
        };

        for (key, value) in entries {
            self.indent(buf, depth);
            primitives::write_key(buf, key);
            match value {
                Value::Array(items) => {
                    buf.push_str(&format!(": [{}]:", items.len()));
                    self.newline(buf);
                    self.write_array_items(buf, items, depth + 1)?;
                }
                Value::Object(nested) => {
                    // An empty object leaves the key with no block, which
                    // reads back as null.
                    buf.push(':');
                    self.newline(buf);
                    self.write_object(buf, nested, depth + 1)?;
                }
                scalar => {
                    buf.push_str(": ");
                    self.write_scalar(buf, scalar)?;
                    self.newline(buf);
                }
            }
        }
        Ok(())
    }

    fn write_table(&self, buf: &mut WriteBuffer, table: &Table) -> Result<()> {
        buf.push('[');
        buf.push_str(&table.n_rows.to_string());
        buf.push_str("]{");
        for (i, column) in table.columns.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            buf.push_str(&column.name);
        }
        buf.push_str("}:");
        self.newline(buf);

        for row in 0..table.n_rows {
            self.indent(buf, 1);
            write_row_cells(buf, &table.columns, row, self.opts.strict)?;
            self.newline(buf);
        }
        Ok(())
    }
}

/// One tabular row: cells comma-space separated, rendered by the scalar
/// rules. Shared with the stream writer.
pub(crate) fn write_row_cells(
    buf: &mut WriteBuffer,
    columns: &[Column],
    row: usize,
    strict: bool,
) -> Result<()> {
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        if column.na[row] {
            primitives::write_null(buf);
            continue;
        }
        match &column.data {
            ColumnData::Logical(v) => primitives::write_bool(buf, v[row]),
            ColumnData::Integer(v) => buf.push_str(&v[row].to_string()),
            ColumnData::Double(v) => primitives::write_double(buf, v[row], strict)?,
            ColumnData::String(v) => buf.push_escaped(&v[row]),
        }
    }
    Ok(())
}

/// Encode a value tree with the given options.
pub fn encode(value: &Value, opts: &EncodeOptions) -> Result<String> {
    Encoder::new(opts.clone()).encode(value)
}

/// Encode a table and write it to `path`.
pub fn write_table(path: impl AsRef<Path>, table: &Table, opts: &EncodeOptions) -> Result<()> {
    let text = Encoder::new(opts.clone()).encode_table(table)?;
    fs::write(path, text)?;
    Ok(())
}
