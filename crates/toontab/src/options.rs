use crate::table::ColType;

/// Options for the DOM parser.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Reject malformed literals, tabs in indentation, non-finite doubles,
    /// and invalid escapes instead of degrading to strings.
    pub strict: bool,
    /// Recognise `#` and `//` comment lines and trailing comments.
    pub allow_comments: bool,
    /// Last occurrence wins when `true`; duplicate keys fail the parse
    /// when `false`.
    pub allow_duplicate_keys: bool,
    /// Accumulate non-fatal anomalies as warnings.
    pub warn: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: true,
            allow_comments: true,
            allow_duplicate_keys: true,
            warn: true,
        }
    }
}

/// Options for the encoder.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Emit indentation and newlines.
    pub pretty: bool,
    /// Spaces per indentation step.
    pub indent: usize,
    /// Fail on NaN and infinite doubles instead of emitting `null`.
    pub strict: bool,
    /// Sort object entries by byte-lexicographic key order.
    pub canonical: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            strict: true,
            canonical: false,
        }
    }
}

/// Policy for tabular rows whose field count differs from the schema width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaggedRows {
    /// Append `V<k+1>` columns (NA-backfilled) as needed and warn once.
    #[default]
    ExpandWarn,
    /// Any width mismatch is a fatal parse error.
    Error,
}

/// Policy for a declared row count that differs from the observed count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NMismatch {
    #[default]
    Warn,
    Error,
}

/// Options shared by the tabular parser and the row streamer.
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub strict: bool,
    pub allow_comments: bool,
    pub warn: bool,
    pub ragged_rows: RaggedRows,
    pub n_mismatch: NMismatch,
    /// Cap on columns synthesised by ragged-row expansion; `None` is
    /// unbounded.
    pub max_extra_cols: Option<usize>,
    /// Locate the tabular header under this top-level key instead of
    /// taking the first header in the input.
    pub key: Option<String>,
    /// Caller-supplied column types; `set` still promotes toward the
    /// lattice join but never below the forced type.
    pub col_types: Vec<(String, ColType)>,
    /// Rows per batch emitted by the row streamer.
    pub batch_size: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            strict: true,
            allow_comments: true,
            warn: true,
            ragged_rows: RaggedRows::default(),
            n_mismatch: NMismatch::default(),
            max_extra_cols: None,
            key: None,
            col_types: Vec::new(),
            batch_size: 10_000,
        }
    }
}
