use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{}", format_parse_error(.message, .line, .column, .snippet, .file))]
    Parse {
        message: String,
        /// 1-indexed; 0 when unknown.
        line: usize,
        /// 1-indexed; 0 when unknown.
        column: usize,
        /// Up to 60 characters of the offending line.
        snippet: String,
        /// Source path, empty when parsing from memory.
        file: String,
    },

    #[error("validation error at line {line}: {message}")]
    Validation { message: String, line: usize },

    #[error("type error: {0}")]
    Type(String),

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl Error {
    pub(crate) fn parse(message: impl Into<String>, line: usize) -> Self {
        Error::Parse {
            message: message.into(),
            line,
            column: 0,
            snippet: String::new(),
            file: String::new(),
        }
    }

    pub(crate) fn parse_at(
        message: impl Into<String>,
        line: usize,
        snippet: &str,
        file: &str,
    ) -> Self {
        Error::Parse {
            message: message.into(),
            line,
            column: 0,
            snippet: make_snippet(snippet),
            file: file.to_string(),
        }
    }

    /// Attach the source path to a location-carrying error. Other
    /// variants pass through untouched.
    pub(crate) fn with_file(self, path: &str) -> Self {
        match self {
            Error::Parse {
                message,
                line,
                column,
                snippet,
                file,
            } if file.is_empty() => Error::Parse {
                message,
                line,
                column,
                snippet,
                file: path.to_string(),
            },
            other => other,
        }
    }
}

fn format_parse_error(
    message: &str,
    line: &usize,
    column: &usize,
    snippet: &str,
    file: &str,
) -> String {
    let mut out = String::from(message);
    if !file.is_empty() {
        out.push_str(&format!(" (file: {file})"));
    }
    if *line > 0 {
        out.push_str(&format!(" at line {line}"));
        if *column > 0 {
            out.push_str(&format!(", column {column}"));
        }
    }
    if !snippet.is_empty() {
        out.push_str(&format!(": `{snippet}`"));
    }
    out
}

/// Truncate an offending line to at most 60 characters for error display.
pub(crate) fn make_snippet(line: &str) -> String {
    if line.chars().count() > 60 {
        let truncated: String = line.chars().take(57).collect();
        format!("{truncated}...")
    } else {
        line.to_string()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal anomaly accumulated during a parse and delivered in a single
/// batch at the end of the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub category: WarningCategory,
    pub message: String,
}

impl Warning {
    pub(crate) fn new(category: WarningCategory, message: impl Into<String>) -> Self {
        Warning {
            category,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCategory {
    NMismatch,
    RaggedRows,
    DuplicateKey,
}

/// Outcome of `validate_str` / `validate_file`. Validation never fails:
/// parse errors are captured into the `error` record instead.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub ok: bool,
    pub error: Option<ValidationIssue>,
}

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub snippet: String,
    pub file: String,
}

impl ValidationReport {
    pub(crate) fn passed() -> Self {
        ValidationReport {
            ok: true,
            error: None,
        }
    }

    pub(crate) fn from_error(err: Error) -> Self {
        let issue = match err {
            Error::Parse {
                message,
                line,
                column,
                snippet,
                file,
            } => ValidationIssue {
                message,
                line,
                column,
                snippet,
                file,
            },
            other => ValidationIssue {
                message: other.to_string(),
                line: 0,
                column: 0,
                snippet: String::new(),
                file: String::new(),
            },
        };
        ValidationReport {
            ok: false,
            error: Some(issue),
        }
    }
}
