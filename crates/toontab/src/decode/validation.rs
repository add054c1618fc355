//! Non-throwing validation entry points.

use std::path::Path;

use crate::decode::parser::Parser;
use crate::error::ValidationReport;
use crate::options::ParseOptions;

/// Check a document for parse errors. Never fails: syntactic problems are
/// reported through the returned record.
pub fn validate_str(text: &str, opts: &ParseOptions) -> ValidationReport {
    match Parser::new(opts.clone()).parse_str(text) {
        Ok(_) => ValidationReport::passed(),
        Err(err) => ValidationReport::from_error(err),
    }
}

pub fn validate_file(path: impl AsRef<Path>, opts: &ParseOptions) -> ValidationReport {
    match Parser::new(opts.clone()).parse_file(path) {
        Ok(_) => ValidationReport::passed(),
        Err(err) => ValidationReport::from_error(err),
    }
}
