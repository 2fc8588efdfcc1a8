// src/fill.rs

use crate::table::{CellValue, Table};
use tracing::debug;

/// What a forward-fill pass did to its column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Missing cells overwritten with a preceding value.
    pub filled: usize,
    /// Missing cells before the first non-missing value; these stay missing.
    pub leading_gap: usize,
}

/// Replace every missing cell in `column` with the nearest non-missing value above it.
///
/// Single top-to-bottom pass. Values are cloned as-is, so a text `"002"` stays text and
/// an `Int` stays an `Int`. Other columns are never touched.
pub fn forward_fill(table: &mut Table, column: usize) -> FillStats {
    let mut stats = FillStats::default();
    let mut last_seen: Option<CellValue> = None;

    for row in table.rows.iter_mut() {
        let cell = &mut row[column];
        if !cell.is_missing() {
            last_seen = Some(cell.clone());
            continue;
        }
        match &last_seen {
            Some(v) => {
                *cell = v.clone();
                stats.filled += 1;
            }
            None => stats.leading_gap += 1,
        }
    }

    debug!(
        column,
        filled = stats.filled,
        leading_gap = stats.leading_gap,
        "forward fill pass done"
    );
    stats
}
