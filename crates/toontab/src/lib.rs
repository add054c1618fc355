#![doc = include_str!("../README.md")]

pub mod decode;
pub mod encode;
pub mod error;
pub mod inspect;
pub mod json;
mod number;
pub mod options;
pub mod table;
pub mod value;

use std::path::Path;

pub use crate::decode::{parse_file, parse_str, validate_file, validate_str, BufferedReader, Parser};
pub use crate::encode::{encode, write_table, Encoder, StreamWriter};
pub use crate::error::{
    Error, Result, ValidationIssue, ValidationReport, Warning, WarningCategory,
};
pub use crate::inspect::{info, peek, Info, Peek, PeekKind};
pub use crate::options::{EncodeOptions, NMismatch, ParseOptions, RaggedRows, TableOptions};
pub use crate::table::{
    ColType, Column, ColumnBuilder, ColumnData, RowStreamer, Table, TabularParser,
};
pub use crate::value::Value;

/// Read a tabular array from memory into a table, returning the warnings
/// accumulated along the way.
pub fn read_table_str(text: &str, opts: &TableOptions) -> Result<(Table, Vec<Warning>)> {
    let mut parser = TabularParser::new(opts.clone());
    let table = parser.read_str(text)?;
    Ok((table, parser.take_warnings()))
}

/// Read a tabular array from a file into a table.
pub fn read_table(path: impl AsRef<Path>, opts: &TableOptions) -> Result<(Table, Vec<Warning>)> {
    let mut parser = TabularParser::new(opts.clone());
    let table = parser.read_file(path)?;
    Ok((table, parser.take_warnings()))
}

/// Stream a tabular file to `sink` in batches of `opts.batch_size` rows.
/// Batches arrive in source order; an error from the sink aborts the
/// stream.
pub fn stream_rows(
    path: impl AsRef<Path>,
    opts: &TableOptions,
    sink: impl FnMut(Table) -> Result<()>,
) -> Result<Vec<Warning>> {
    let mut streamer = RowStreamer::new(opts.clone());
    streamer.stream_file(path, sink)?;
    Ok(streamer.take_warnings())
}

/// Parse a document and re-encode it with the given emission options.
pub fn reformat_str(text: &str, opts: &EncodeOptions) -> Result<String> {
    let value = parse_str(text, &ParseOptions::default())?;
    encode(&value, opts)
}

pub fn reformat_file(path: impl AsRef<Path>, opts: &EncodeOptions) -> Result<String> {
    let value = parse_file(path, &ParseOptions::default())?;
    encode(&value, opts)
}
