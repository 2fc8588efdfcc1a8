// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop (or, under a strict policy, spoil) a fill run.
#[derive(Debug, Error)]
pub enum FillError {
    #[error("cannot read spreadsheet {path:?}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("sheet '{sheet}' has no data rows")]
    EmptyTable { sheet: String },

    #[error("column {selector} not found (available: {})", available.join(", "))]
    ColumnNotFound {
        selector: String,
        available: Vec<String>,
    },

    /// Only raised under `FillPolicy::Strict`; lenient runs report it in the `FillReport`.
    #[error("column '{column}' still has {remaining} missing cell(s) after filling (data rows {rows:?})")]
    IncompleteFill {
        column: String,
        remaining: usize,
        rows: Vec<usize>,
    },

    #[error("cannot write spreadsheet {path:?}: {reason}")]
    DestinationUnwritable { path: PathBuf, reason: String },
}

impl FillError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        FillError::SourceUnreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn unwritable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        FillError::DestinationUnwritable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the kinds that fail a run regardless of the fill policy.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FillError::IncompleteFill { .. })
    }
}
