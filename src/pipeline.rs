// src/pipeline.rs

use crate::{
    error::FillError,
    fill::forward_fill,
    load::load_table,
    report::Reporter,
    table::ColumnSelector,
    validate::{check_filled, ensure_non_empty},
    write::write_table,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// What to do when the target column still has gaps after filling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillPolicy {
    /// Write the partially filled table and flag the run as `Incomplete`.
    #[default]
    Lenient,
    /// Fail with `IncompleteFill` and write nothing.
    Strict,
}

/// Inputs for one fill run.
#[derive(Debug, Clone)]
pub struct FillRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Sheet to read; the first sheet when `None`.
    pub sheet: Option<String>,
    pub column: ColumnSelector,
    pub policy: FillPolicy,
}

impl FillRequest {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            sheet: None,
            column: ColumnSelector::default(),
            policy: FillPolicy::default(),
        }
    }

    pub fn sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn column(mut self, column: ColumnSelector) -> Self {
        self.column = column;
        self
    }

    pub fn policy(mut self, policy: FillPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStatus {
    Complete,
    /// The column began with missing cells that had nothing to carry forward.
    Incomplete,
}

/// Outcome of a run that reached the writer.
#[derive(Debug, Clone, Serialize)]
pub struct FillReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub sheet: String,
    pub column: String,
    pub column_index: usize,
    pub rows: usize,
    pub filled: usize,
    pub remaining_missing: usize,
    pub status: FillStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FillReport {
    pub fn is_complete(&self) -> bool {
        self.status == FillStatus::Complete
    }
}

/// Load → check non-empty → forward-fill → check gaps → write.
///
/// Every error aborts before the destination is touched. Under `FillPolicy::Lenient`
/// a leading gap is written out and reported as `FillStatus::Incomplete`.
#[tracing::instrument(level = "info", skip_all, fields(source = %req.source.display()))]
pub fn run(req: &FillRequest, reporter: &mut dyn Reporter) -> Result<FillReport, FillError> {
    let started_at = Utc::now();

    let mut table = load_table(&req.source, req.sheet.as_deref())?;
    ensure_non_empty(&table)?;
    reporter.loaded(&table);

    let column = table.resolve(&req.column)?;
    let stats = forward_fill(&mut table, column);

    let check = check_filled(&table, column);
    let status = if check.is_complete() {
        FillStatus::Complete
    } else {
        match req.policy {
            FillPolicy::Strict => return Err(check.into_error()),
            FillPolicy::Lenient => {
                warn!(
                    column = %check.column,
                    remaining = check.remaining(),
                    rows = ?check.missing_rows,
                    "target column still has missing cells with no preceding value"
                );
                FillStatus::Incomplete
            }
        }
    };

    write_table(&table, &req.destination)?;

    let report = FillReport {
        source: req.source.clone(),
        destination: req.destination.clone(),
        sheet: table.sheet.clone(),
        column: check.column.clone(),
        column_index: column,
        rows: table.row_count(),
        filled: stats.filled,
        remaining_missing: check.remaining(),
        status,
        started_at,
        finished_at: Utc::now(),
    };
    info!(
        destination = %report.destination.display(),
        filled = report.filled,
        status = ?report.status,
        "fill run done"
    );
    reporter.finished(&report);
    Ok(report)
}
