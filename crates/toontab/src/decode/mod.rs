//! Decoding pipeline: buffered line reading, line classification, and the
//! recursive-descent DOM parser.

pub mod parser;
pub mod reader;
pub(crate) mod scanner;
pub mod validation;

use std::path::Path;

use crate::error::Result;
use crate::options::ParseOptions;
use crate::value::Value;

pub use parser::Parser;
pub use reader::BufferedReader;
pub use validation::{validate_file, validate_str};

/// Parse a TOON document from memory, discarding warnings. Use [`Parser`]
/// directly when warnings matter.
pub fn parse_str(text: &str, opts: &ParseOptions) -> Result<Value> {
    Parser::new(opts.clone()).parse_str(text)
}

/// Parse a TOON document from a file.
pub fn parse_file(path: impl AsRef<Path>, opts: &ParseOptions) -> Result<Value> {
    Parser::new(opts.clone()).parse_file(path)
}
