// src/table.rs

use crate::error::FillError;
use std::{fmt, str::FromStr};

/// A single cell as loaded from the sheet.
///
/// `Missing` is an absent cell; `Text("")` is a present, empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Excel serial date-time (days since the workbook epoch).
    DateTime(f64),
    /// Error literal such as `#N/A`.
    Error(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => f.write_str("NaN"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            CellValue::DateTime(serial) => write!(f, "{}", serial),
            CellValue::Error(e) => f.write_str(e),
        }
    }
}

/// Which column to fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Zero-based position.
    Index(usize),
    /// Header name, after de-duplication (`Type`, `Type.1`, ...).
    Name(String),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Index(0)
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnSelector::Index(i) => write!(f, "#{}", i),
            ColumnSelector::Name(n) => write!(f, "'{}'", n),
        }
    }
}

/// `#3` or a bare number selects by position, anything else by name.
impl FromStr for ColumnSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        Ok(match digits.parse::<usize>() {
            Ok(i) => ColumnSelector::Index(i),
            Err(_) => ColumnSelector::Name(s.to_string()),
        })
    }
}

/// One sheet's worth of data: a header row plus rectangular data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the sheet the data came from; reused when writing.
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(sheet: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();
        Self {
            sheet: sheet.into(),
            headers,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Resolve a selector to a column position.
    pub fn resolve(&self, selector: &ColumnSelector) -> Result<usize, FillError> {
        let found = match selector {
            ColumnSelector::Index(i) if *i < self.width() => Some(*i),
            ColumnSelector::Index(_) => None,
            ColumnSelector::Name(name) => self.headers.iter().position(|h| h == name),
        };
        found.ok_or_else(|| FillError::ColumnNotFound {
            selector: selector.to_string(),
            available: self.headers.clone(),
        })
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }
}
