//! Incremental tabular writer with a row-count placeholder back-patched
//! at close.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::encode::writer::WriteBuffer;
use crate::encode::write_row_cells;
use crate::error::{Error, Result};
use crate::table::Table;

/// Appends tabular batches to a file. The header is written at creation
/// with a `[0]` row-count placeholder; `close` patches it to the actual
/// count. The output is byte-identical to `write_table` for the same
/// rows.
pub struct StreamWriter {
    path: PathBuf,
    schema: Vec<String>,
    indent: usize,
    out: Option<BufWriter<File>>,
    rows_written: usize,
}

impl StreamWriter {
    /// Open `path` for writing and emit the placeholder header.
    pub fn create(
        path: impl AsRef<Path>,
        schema: Vec<String>,
        indent: usize,
    ) -> Result<StreamWriter> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let mut out = BufWriter::new(file);
        write!(out, "[0]{{{}}}:", schema.join(","))?;
        writeln!(out)?;
        Ok(StreamWriter {
            path,
            schema,
            indent,
            out: Some(out),
            rows_written: 0,
        })
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append every row of `table`. The batch must match the schema
    /// width.
    pub fn write_batch(&mut self, table: &Table) -> Result<()> {
        let Some(out) = self.out.as_mut() else {
            return Err(Error::Encoding("stream writer is closed".to_string()));
        };
        if table.n_cols() != self.schema.len() {
            return Err(Error::Type(format!(
                "batch has {} columns but the writer schema has {}",
                table.n_cols(),
                self.schema.len()
            )));
        }
        for row in 0..table.n_rows {
            let mut buf = WriteBuffer::new();
            buf.indent(self.indent);
            write_row_cells(&mut buf, &table.columns, row, false)?;
            buf.push('\n');
            out.write_all(buf.into_string().as_bytes())?;
        }
        self.rows_written += table.n_rows;
        Ok(())
    }

    /// Flush, then rewrite the file with the first `[0]` replaced by the
    /// actual row count. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut out) = self.out.take() else {
            return Ok(());
        };
        out.flush()?;
        drop(out);

        let content = fs::read_to_string(&self.path)?;
        let patched = match content.find("[0]") {
            Some(pos) => {
                let mut s = String::with_capacity(content.len() + 16);
                s.push_str(&content[..pos]);
                s.push_str(&format!("[{}]", self.rows_written));
                s.push_str(&content[pos + 3..]);
                s
            }
            None => content,
        };
        fs::write(&self.path, patched)?;
        Ok(())
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
