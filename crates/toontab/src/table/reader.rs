//! One-shot tabular parsing: locate the header, ingest rows into column
//! builders, finalise into a [`Table`].

use std::path::Path;

use crate::decode::reader::BufferedReader;
use crate::decode::scanner::{self, find_unquoted_colon};
use crate::error::{Error, Result, Warning, WarningCategory};
use crate::options::{NMismatch, RaggedRows, TableOptions};
use crate::table::{ColumnBuilder, Table};

/// Schema discovered by header location.
#[derive(Debug, Clone)]
pub(crate) struct TabularSchema {
    pub declared_rows: usize,
    pub field_names: Vec<String>,
    pub delimiter: char,
    /// Indent of the line that carried the header; ingestion stops at the
    /// first non-empty line at this indent or shallower.
    pub header_indent: usize,
}

/// Locate the tabular header, optionally under `key:`. Consumes reader
/// lines up to and including the header line.
pub(crate) fn find_tabular_header(
    reader: &mut BufferedReader<'_>,
    opts: &TableOptions,
) -> Result<TabularSchema> {
    if let Some(target) = opts.key.as_deref() {
        let mut found = false;
        while let Some((line, _line_no)) = reader.next_line()? {
            let trimmed = line.trim();
            if trimmed.is_empty() || (opts.allow_comments && scanner::is_comment(trimmed)) {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            if indent != 0 {
                continue;
            }
            let Some(colon) = find_unquoted_colon(trimmed) else {
                continue;
            };
            if trimmed[..colon].trim() != target {
                continue;
            }
            found = true;
            let value = trimmed[colon + 1..].trim();
            if value.starts_with('[') {
                if let Some(schema) = parse_tabular_header(value, 0) {
                    return Ok(schema);
                }
            }
            break;
        }
        if !found {
            return Err(Error::parse(format!("key not found: {target}"), 0));
        }
    }

    while let Some((line, _line_no)) = reader.next_line()? {
        let trimmed = line.trim();
        if trimmed.is_empty() || (opts.allow_comments && scanner::is_comment(trimmed)) {
            continue;
        }
        if trimmed.starts_with('[') && trimmed.contains('{') && trimmed.contains('}') {
            let indent = line.len() - line.trim_start().len();
            if let Some(schema) = parse_tabular_header(trimmed, indent) {
                return Ok(schema);
            }
        }
    }

    Err(Error::parse("no tabular array found", 0))
}

fn parse_tabular_header(text: &str, header_indent: usize) -> Option<TabularSchema> {
    let header = scanner::parse_array_header(text)?;
    if !header.is_tabular() {
        return None;
    }
    Some(TabularSchema {
        declared_rows: header.declared,
        field_names: header.fields,
        delimiter: header.delimiter,
        header_indent,
    })
}

/// Fresh builders for the current schema, with caller-forced types
/// applied.
pub(crate) fn make_builders(
    field_names: &[String],
    capacity: usize,
    opts: &TableOptions,
) -> Vec<ColumnBuilder> {
    field_names
        .iter()
        .map(|name| {
            let mut b = ColumnBuilder::with_capacity(name.clone(), capacity.max(1));
            if let Some((_, ty)) = opts.col_types.iter().find(|(n, _)| n == name) {
                b.force_type(*ty);
            }
            b
        })
        .collect()
}

/// Per-run ragged-row bookkeeping shared by the one-shot parser and the
/// streamer.
#[derive(Debug)]
pub(crate) struct RaggedState {
    pub min_fields: usize,
    pub max_fields: usize,
    pub expansions: usize,
}

impl RaggedState {
    pub fn new() -> Self {
        RaggedState {
            min_fields: usize::MAX,
            max_fields: 0,
            expansions: 0,
        }
    }

    pub fn observe(&mut self, n_fields: usize) {
        self.min_fields = self.min_fields.min(n_fields);
        self.max_fields = self.max_fields.max(n_fields);
    }

    pub fn is_ragged(&self) -> bool {
        self.max_fields > 0 && self.min_fields != self.max_fields
    }
}

/// Grow the schema to `n_fields` columns, naming new columns `V<k+1>` and
/// back-filling them with NA for all `backfill_rows` already seen.
pub(crate) fn expand_schema(
    field_names: &mut Vec<String>,
    columns: &mut Vec<ColumnBuilder>,
    n_fields: usize,
    backfill_rows: usize,
    ragged: &mut RaggedState,
    opts: &TableOptions,
    line_no: usize,
) -> Result<()> {
    let extra = n_fields - columns.len();
    if let Some(cap) = opts.max_extra_cols {
        if ragged.expansions + extra > cap {
            return Err(Error::Validation {
                message: "max_extra_cols exceeded".to_string(),
                line: line_no,
            });
        }
    }
    for i in columns.len()..n_fields {
        let name = format!("V{}", i + 1);
        let mut builder = ColumnBuilder::with_capacity(name.clone(), backfill_rows.max(1));
        if let Some((_, ty)) = opts.col_types.iter().find(|(n, _)| n == &name) {
            builder.force_type(*ty);
        }
        for row in 0..backfill_rows {
            builder.set_null(row);
        }
        field_names.push(name);
        columns.push(builder);
    }
    ragged.expansions += extra;
    Ok(())
}

/// Store one split row into the builders, expanding the schema for overlong
/// rows under the expand-warn policy.
pub(crate) fn store_row(
    body: &str,
    line_no: usize,
    row: usize,
    field_names: &mut Vec<String>,
    columns: &mut Vec<ColumnBuilder>,
    schema: &TabularSchema,
    ragged: &mut RaggedState,
    opts: &TableOptions,
) -> Result<()> {
    let fields = scanner::split_row(body, schema.delimiter);
    let n_fields = fields.len();
    ragged.observe(n_fields);

    if n_fields != columns.len() {
        if opts.ragged_rows == RaggedRows::Error {
            return Err(Error::Validation {
                message: format!(
                    "row has {n_fields} fields but expected {}",
                    columns.len()
                ),
                line: line_no,
            });
        }
        if n_fields > columns.len() {
            expand_schema(field_names, columns, n_fields, row, ragged, opts, line_no)?;
        }
    }

    for (i, column) in columns.iter_mut().enumerate() {
        match fields.get(i) {
            Some(field) => column.set(row, field),
            None => column.set_null(row),
        }
    }
    Ok(())
}

/// Build the end-of-run warnings and apply the error policies.
pub(crate) fn finalise_warnings(
    declared: usize,
    observed: usize,
    n_cols: usize,
    ragged: &RaggedState,
    opts: &TableOptions,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    if declared > 0 && observed != declared {
        if opts.n_mismatch == NMismatch::Error {
            return Err(Error::Validation {
                message: format!("Declared [{declared}] but observed {observed} rows"),
                line: 0,
            });
        }
        if opts.warn {
            warnings.push(Warning::new(
                WarningCategory::NMismatch,
                format!("Declared [{declared}] but observed {observed} rows; using observed."),
            ));
        }
    }
    if ragged.is_ragged() && opts.warn {
        let mut message = format!(
            "Tabular rows had inconsistent field counts (min={}, max={}).",
            ragged.min_fields, ragged.max_fields
        );
        if ragged.expansions > 0 {
            message.push_str(&format!(" Schema expanded to {n_cols} columns;"));
        }
        message.push_str(" missing values filled with NA.");
        warnings.push(Warning::new(WarningCategory::RaggedRows, message));
    }
    Ok(())
}

/// Row preprocessing shared by ingestion loops: indent measurement (with
/// the strict tab rule), blank/comment skipping, trailing-comment removal.
/// Returns `None` for lines that carry no row.
pub(crate) fn row_body<'a>(
    line: &'a str,
    line_no: usize,
    opts: &TableOptions,
) -> Result<Option<(usize, &'a str)>> {
    let indent = scanner::count_indent(line, line_no, opts.strict)?;
    let body = line[indent.min(line.len())..].trim();
    if body.is_empty() {
        return Ok(None);
    }
    if opts.allow_comments {
        if scanner::is_comment(body) {
            return Ok(None);
        }
        let stripped = scanner::strip_trailing_comment(body);
        if stripped.is_empty() {
            return Ok(None);
        }
        return Ok(Some((indent, stripped)));
    }
    Ok(Some((indent, body)))
}

/// Three-phase tabular reader: locate, ingest, finalise.
pub struct TabularParser {
    opts: TableOptions,
    warnings: Vec<Warning>,
}

impl TabularParser {
    pub fn new(opts: TableOptions) -> Self {
        TabularParser {
            opts,
            warnings: Vec::new(),
        }
    }

    /// Warnings accumulated by the most recent read.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn read_str(&mut self, text: &str) -> Result<Table> {
        self.warnings.clear();
        let mut reader = BufferedReader::from_slice(text.as_bytes());
        self.read(&mut reader)
    }

    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<Table> {
        self.warnings.clear();
        let file = path.as_ref().display().to_string();
        let mut reader = BufferedReader::open(path).map_err(|e| e.with_file(&file))?;
        self.read(&mut reader).map_err(|e| e.with_file(&file))
    }

    fn read(&mut self, reader: &mut BufferedReader<'_>) -> Result<Table> {
        let schema = find_tabular_header(reader, &self.opts)?;
        let capacity = schema.declared_rows.max(1000);
        let mut field_names = schema.field_names.clone();
        let mut columns = make_builders(&field_names, capacity, &self.opts);
        let mut ragged = RaggedState::new();
        let mut observed = 0usize;

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
                observed,
                &mut field_names,
                &mut columns,
                &schema,
                &mut ragged,
                &self.opts,
            )?;
            observed += 1;
        }

        finalise_warnings(
            schema.declared_rows,
            observed,
            columns.len(),
            &ragged,
            &self.opts,
            &mut self.warnings,
        )?;

        let columns: Vec<_> = columns.into_iter().map(ColumnBuilder::finalize).collect();
        Ok(Table {
            columns,
            n_rows: observed,
        })
    }
}
