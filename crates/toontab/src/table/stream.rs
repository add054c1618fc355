//! Streaming tabular reads: fixed-size batches delivered to a sink.

use std::path::Path;

use crate::decode::reader::BufferedReader;
use crate::error::{Result, Warning};
use crate::options::TableOptions;
use crate::table::reader::{
    find_tabular_header, finalise_warnings, make_builders, row_body, store_row, RaggedState,
};
use crate::table::{ColumnBuilder, Table};

/// How often the cooperative cancellation probe runs, in rows.
const CANCEL_CHECK_INTERVAL: usize = 10_000;

/// Reads a tabular array like [`TabularParser`](crate::TabularParser) but
/// emits fixed-size [`Table`] batches to a sink instead of materialising
/// the whole table. Batches arrive in source order; each batch transfers
/// ownership to the sink. An error returned by the sink aborts the
/// stream.
pub struct RowStreamer {
    opts: TableOptions,
    warnings: Vec<Warning>,
    cancel_probe: Option<Box<dyn Fn() -> Result<()>>>,
}

impl RowStreamer {
    pub fn new(opts: TableOptions) -> Self {
        RowStreamer {
            opts,
            warnings: Vec::new(),
            cancel_probe: None,
        }
    }

    /// Install a cooperative cancellation probe, invoked at least once
    /// per 10 000 rows. The probe cancels the stream by returning an
    /// error, which propagates to the caller.
    pub fn with_cancel_probe(mut self, probe: impl Fn() -> Result<()> + 'static) -> Self {
        self.cancel_probe = Some(Box::new(probe));
        self
    }

    /// Warnings accumulated by the most recent stream.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn stream_str(
        &mut self,
        text: &str,
        sink: impl FnMut(Table) -> Result<()>,
    ) -> Result<()> {
        self.warnings.clear();
        let mut reader = BufferedReader::from_slice(text.as_bytes());
        self.stream(&mut reader, sink)
    }

    pub fn stream_file(
        &mut self,
        path: impl AsRef<Path>,
        sink: impl FnMut(Table) -> Result<()>,
    ) -> Result<()> {
        self.warnings.clear();
        let file = path.as_ref().display().to_string();
        let mut reader = BufferedReader::open(path).map_err(|e| e.with_file(&file))?;
        self.stream(&mut reader, sink).map_err(|e| e.with_file(&file))
    }

    fn stream(
        &mut self,
        reader: &mut BufferedReader<'_>,
        mut sink: impl FnMut(Table) -> Result<()>,
    ) -> Result<()> {
        let batch_size = self.opts.batch_size.max(1);
        let schema = find_tabular_header(reader, &self.opts)?;
        let mut field_names = schema.field_names.clone();
        let mut columns = make_builders(&field_names, batch_size, &self.opts);
        let mut ragged = RaggedState::new();
        let mut batch_rows = 0usize;
        let mut observed = 0usize;
        let mut rows_since_probe = 0usize;

        while let Some((line, line_no)) = reader.next_line()? {
            let Some((indent, body)) = row_body(line, line_no, &self.opts)? else {
                continue;
            };
            if indent <= schema.header_indent {
                break;
            }
            store_row(
                body,
                line_no,
                batch_rows,
                &mut field_names,
                &mut columns,
                &schema,
                &mut ragged,
                &self.opts,
            )?;
            batch_rows += 1;
            observed += 1;

            if batch_rows >= batch_size {
                let batch = take_batch(&mut columns, &field_names, batch_size, &self.opts);
                sink(Table {
                    columns: batch,
                    n_rows: batch_rows,
                })?;
                batch_rows = 0;
            }

            rows_since_probe += 1;
            if rows_since_probe >= CANCEL_CHECK_INTERVAL {
                rows_since_probe = 0;
                if let Some(probe) = &self.cancel_probe {
                    probe()?;
                }
            }
        }

        if batch_rows > 0 {
            let batch = take_batch(&mut columns, &field_names, batch_size, &self.opts);
            sink(Table {
                columns: batch,
                n_rows: batch_rows,
            })?;
        }

        finalise_warnings(
            schema.declared_rows,
            observed,
            field_names.len(),
            &ragged,
            &self.opts,
            &mut self.warnings,
        )
    }
}

/// Finalise the current builders into a batch, replacing them with fresh
/// ones that inherit the current schema (expanded columns included) and
/// any caller-forced types.
fn take_batch(
    columns: &mut Vec<ColumnBuilder>,
    field_names: &[String],
    batch_size: usize,
    opts: &TableOptions,
) -> Vec<crate::table::Column> {
    let fresh = make_builders(field_names, batch_size, opts);
    std::mem::replace(columns, fresh)
        .into_iter()
        .map(ColumnBuilder::finalize)
        .collect()
}
