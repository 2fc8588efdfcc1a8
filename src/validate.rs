// src/validate.rs

use crate::{error::FillError, table::Table};

/// Pre-fill check: a table with no data rows has nothing to fill.
pub fn ensure_non_empty(table: &Table) -> Result<(), FillError> {
    if table.is_empty() {
        return Err(FillError::EmptyTable {
            sheet: table.sheet.clone(),
        });
    }
    Ok(())
}

pub fn count_missing(table: &Table, column: usize) -> usize {
    table.column(column).filter(|c| c.is_missing()).count()
}

/// Post-fill state of the target column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillCheck {
    pub column: String,
    /// Zero-based data-row indices still missing.
    pub missing_rows: Vec<usize>,
}

impl FillCheck {
    pub fn remaining(&self) -> usize {
        self.missing_rows.len()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_rows.is_empty()
    }

    pub fn into_error(self) -> FillError {
        FillError::IncompleteFill {
            remaining: self.remaining(),
            column: self.column,
            rows: self.missing_rows,
        }
    }
}

/// Post-fill check. Never fails by itself; the caller's policy decides.
pub fn check_filled(table: &Table, column: usize) -> FillCheck {
    let missing_rows = table
        .column(column)
        .enumerate()
        .filter(|(_, c)| c.is_missing())
        .map(|(i, _)| i)
        .collect();
    FillCheck {
        column: table.headers[column].clone(),
        missing_rows,
    }
}
