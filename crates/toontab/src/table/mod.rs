//! Columnar tables decoded from tabular arrays.

pub mod builder;
pub mod reader;
pub mod stream;

pub use builder::ColumnBuilder;
pub use reader::TabularParser;
pub use stream::RowStreamer;

use crate::number::INT_NA;
use crate::value::Value;

/// Column type lattice: `Unknown < Logical < Integer < Double < String`,
/// with promotion always moving upward. A column holding booleans that
/// later sees free text jumps straight to `String`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColType {
    Unknown,
    Logical,
    Integer,
    Double,
    String,
}

impl ColType {
    /// Least upper bound of two observed types.
    pub fn join(self, other: ColType) -> ColType {
        self.max(other)
    }
}

/// Typed backing storage of a finalised column. NA slots hold the
/// type-specific sentinel (`false`, `i32::MIN`, NaN, `""`); the NA mask on
/// the owning [`Column`] is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Logical(Vec<bool>),
    Integer(Vec<i32>),
    Double(Vec<f64>),
    String(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Logical(v) => v.len(),
            ColumnData::Integer(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finalised, NA-aware column. The backing array and the NA mask always
/// have identical length.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
    pub na: Vec<bool>,
}

impl Column {
    pub fn col_type(&self) -> ColType {
        match self.data {
            ColumnData::Logical(_) => ColType::Logical,
            ColumnData::Integer(_) => ColType::Integer,
            ColumnData::Double(_) => ColType::Double,
            ColumnData::String(_) => ColType::String,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_na(&self, row: usize) -> bool {
        self.na[row]
    }

    /// The cell at `row` as a [`Value`] (`Null` when masked).
    pub fn value(&self, row: usize) -> Value {
        if self.na[row] {
            return Value::Null;
        }
        match &self.data {
            ColumnData::Logical(v) => Value::Bool(v[row]),
            ColumnData::Integer(v) => Value::Int(i64::from(v[row])),
            ColumnData::Double(v) => Value::Double(v[row]),
            ColumnData::String(v) => Value::String(v[row].clone()),
        }
    }

    pub fn logical(name: impl Into<String>, values: Vec<Option<bool>>) -> Column {
        let na: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data = values.into_iter().map(|v| v.unwrap_or(false)).collect();
        Column {
            name: name.into(),
            data: ColumnData::Logical(data),
            na,
        }
    }

    pub fn integer(name: impl Into<String>, values: Vec<Option<i32>>) -> Column {
        let na: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data = values.into_iter().map(|v| v.unwrap_or(INT_NA)).collect();
        Column {
            name: name.into(),
            data: ColumnData::Integer(data),
            na,
        }
    }

    pub fn double(name: impl Into<String>, values: Vec<Option<f64>>) -> Column {
        let na: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data = values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect();
        Column {
            name: name.into(),
            data: ColumnData::Double(data),
            na,
        }
    }

    pub fn string(name: impl Into<String>, values: Vec<Option<String>>) -> Column {
        let na: Vec<bool> = values.iter().map(Option::is_none).collect();
        let data = values.into_iter().map(Option::unwrap_or_default).collect();
        Column {
            name: name.into(),
            data: ColumnData::String(data),
            na,
        }
    }
}

/// A decoded tabular array: every column has length `n_rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub n_rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Table {
        let n_rows = columns.first().map_or(0, Column::len);
        debug_assert!(columns.iter().all(|c| c.len() == n_rows));
        Table { columns, n_rows }
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The cells of one row, in column order.
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.value(row)).collect()
    }
}
