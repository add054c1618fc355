//! Typed, NA-aware column accumulation with monotonic type promotion.

use crate::decode::scanner::unescape_quoted;
use crate::number::{self, INT_NA};
use crate::table::{ColType, Column, ColumnData};

/// Accumulates one column of a tabular array, inferring its type from the
/// values observed and promoting along the lattice
/// `Unknown < Logical < Integer < Double < String` as later rows demand.
/// Promotion back-converts every buffered value; NA slots are preserved.
///
/// Invariant after every `set` / `set_null`: the active backing array and
/// the NA mask have identical length, equal to the row count.
#[derive(Debug)]
pub struct ColumnBuilder {
    name: String,
    ty: ColType,
    len: usize,
    lgl: Vec<bool>,
    int: Vec<i32>,
    dbl: Vec<f64>,
    str_: Vec<String>,
    na: Vec<bool>,
}

impl ColumnBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, 1000)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let mut b = ColumnBuilder {
            name: name.into(),
            ty: ColType::Unknown,
            len: 0,
            lgl: Vec::new(),
            int: Vec::new(),
            dbl: Vec::new(),
            str_: Vec::new(),
            na: Vec::new(),
        };
        b.ensure_capacity(capacity);
        b
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn col_type(&self) -> ColType {
        self.ty
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn ensure_capacity(&mut self, n: usize) {
        self.na.reserve(n.saturating_sub(self.na.len()));
        let additional = n.saturating_sub(self.len);
        match self.ty {
            // Null values observed before a type decision live in the
            // logical array.
            ColType::Unknown | ColType::Logical => self.lgl.reserve(additional),
            ColType::Integer => self.int.reserve(additional),
            ColType::Double => self.dbl.reserve(additional),
            ColType::String => self.str_.reserve(additional),
        }
    }

    /// Caller-supplied type. Subsequent `set` calls still promote toward
    /// the lattice join, never below.
    pub fn force_type(&mut self, ty: ColType) {
        let target = self.ty.join(ty);
        if target != self.ty {
            self.promote_to(target);
        }
    }

    /// Mark `row` as NA, extending the column if needed.
    pub fn set_null(&mut self, row: usize) {
        self.extend_to(row + 1);
        self.na[row] = true;
        match self.ty {
            ColType::Unknown | ColType::Logical => self.lgl[row] = false,
            ColType::Integer => self.int[row] = INT_NA,
            ColType::Double => self.dbl[row] = f64::NAN,
            ColType::String => self.str_[row].clear(),
        }
    }

    /// Recognise and store one field. The text is trimmed, then matched
    /// as `null`, boolean, quoted string, integer, double, and finally an
    /// unquoted string, promoting the column as required.
    pub fn set(&mut self, row: usize, text: &str) {
        let text = text.trim();

        if text == "null" {
            self.set_null(row);
            return;
        }
        if text == "true" || text == "false" {
            self.store_logical(row, text == "true");
            return;
        }
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            let unquoted = unescape_quoted(text)
                .unwrap_or_else(|| text[1..text.len() - 1].to_string());
            self.store_string(row, unquoted);
            return;
        }
        if let Some(i) = number::parse_integer(text) {
            self.store_integer(row, i as i32, text);
            return;
        }
        if let Some(d) = number::parse_double(text) {
            self.store_double(row, d, text);
            return;
        }
        self.store_string(row, text.to_string());
    }

    fn store_logical(&mut self, row: usize, value: bool) {
        match self.ty.join(ColType::Logical) {
            ColType::Logical => {
                self.become_type(ColType::Logical);
                self.extend_to(row + 1);
                self.lgl[row] = value;
            }
            ColType::Integer => {
                self.extend_to(row + 1);
                self.int[row] = i32::from(value);
            }
            ColType::Double => {
                self.extend_to(row + 1);
                self.dbl[row] = f64::from(u8::from(value));
            }
            _ => {
                self.become_type(ColType::String);
                self.extend_to(row + 1);
                self.str_[row] = if value { "true" } else { "false" }.to_string();
            }
        }
        self.na[row] = false;
    }

    fn store_integer(&mut self, row: usize, value: i32, text: &str) {
        match self.ty.join(ColType::Integer) {
            ColType::Integer => {
                self.become_type(ColType::Integer);
                self.extend_to(row + 1);
                self.int[row] = value;
            }
            ColType::Double => {
                self.extend_to(row + 1);
                self.dbl[row] = f64::from(value);
            }
            _ => {
                self.extend_to(row + 1);
                self.str_[row] = text.to_string();
            }
        }
        self.na[row] = false;
    }

    fn store_double(&mut self, row: usize, value: f64, text: &str) {
        match self.ty.join(ColType::Double) {
            ColType::Double => {
                self.become_type(ColType::Double);
                self.extend_to(row + 1);
                self.dbl[row] = value;
            }
            _ => {
                self.extend_to(row + 1);
                self.str_[row] = text.to_string();
            }
        }
        self.na[row] = false;
    }

    fn store_string(&mut self, row: usize, value: String) {
        self.become_type(ColType::String);
        self.extend_to(row + 1);
        self.str_[row] = value;
        self.na[row] = false;
    }

    fn become_type(&mut self, ty: ColType) {
        if self.ty != ty {
            self.promote_to(ty);
        }
    }

    /// Rewrite all buffered rows into `new_ty` storage. Only upward
    /// lattice moves occur.
    fn promote_to(&mut self, new_ty: ColType) {
        debug_assert!(new_ty > self.ty);
        match new_ty {
            ColType::Integer => {
                // Unknown holds only NA rows in the logical array.
                self.int = (0..self.len)
                    .map(|i| if self.na[i] { INT_NA } else { i32::from(self.lgl[i]) })
                    .collect();
                self.lgl = Vec::new();
            }
            ColType::Double => {
                self.dbl = match self.ty {
                    ColType::Integer => (0..self.len)
                        .map(|i| if self.na[i] { f64::NAN } else { f64::from(self.int[i]) })
                        .collect(),
                    _ => (0..self.len)
                        .map(|i| {
                            if self.na[i] {
                                f64::NAN
                            } else {
                                f64::from(u8::from(self.lgl[i]))
                            }
                        })
                        .collect(),
                };
                self.lgl = Vec::new();
                self.int = Vec::new();
            }
            ColType::String => {
                self.str_ = (0..self.len)
                    .map(|i| {
                        if self.na[i] {
                            return String::new();
                        }
                        match self.ty {
                            ColType::Integer => self.int[i].to_string(),
                            ColType::Double => self.dbl[i].to_string(),
                            _ => if self.lgl[i] { "true" } else { "false" }.to_string(),
                        }
                    })
                    .collect();
                self.lgl = Vec::new();
                self.int = Vec::new();
                self.dbl = Vec::new();
            }
            ColType::Logical | ColType::Unknown => {}
        }
        self.ty = new_ty;
    }

    /// Grow to `n` rows, padding new slots as NA.
    fn extend_to(&mut self, n: usize) {
        if n <= self.len {
            return;
        }
        self.na.resize(n, true);
        match self.ty {
            ColType::Unknown | ColType::Logical => self.lgl.resize(n, false),
            ColType::Integer => self.int.resize(n, INT_NA),
            ColType::Double => self.dbl.resize(n, f64::NAN),
            ColType::String => self.str_.resize(n, String::new()),
        }
        self.len = n;
    }

    /// Snapshot into a finalised [`Column`]. A column that never saw a
    /// typed value becomes an all-NA logical column.
    pub fn finalize(mut self) -> Column {
        if self.ty == ColType::Unknown {
            self.ty = ColType::Logical;
        }
        let data = match self.ty {
            ColType::Logical | ColType::Unknown => ColumnData::Logical(self.lgl),
            ColType::Integer => ColumnData::Integer(self.int),
            ColType::Double => ColumnData::Double(self.dbl),
            ColType::String => ColumnData::String(self.str_),
        };
        debug_assert_eq!(data.len(), self.na.len());
        Column {
            name: self.name,
            data,
            na: self.na,
        }
    }
}
