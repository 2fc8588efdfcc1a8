// src/report.rs

use crate::{
    pipeline::{FillReport, FillStatus},
    table::Table,
    validate::count_missing,
};
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

/// Observer hooks for a fill run. Purely informational.
pub trait Reporter {
    /// Called once the source table is loaded, before any fill.
    fn loaded(&mut self, table: &Table);

    /// Called after the destination has been written.
    fn finished(&mut self, report: &FillReport);
}

/// Reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn loaded(&mut self, _table: &Table) {}
    fn finished(&mut self, _report: &FillReport) {}
}

/// Human-readable report: a preview of the first rows and a completion line.
pub struct ConsoleReporter<W: Write> {
    out: W,
    preview_rows: usize,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(preview_rows: usize) -> Self {
        Self::new(io::stdout(), preview_rows)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, preview_rows: usize) -> Self {
        Self { out, preview_rows }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        // a closed stdout must not fail the run
        if let Err(e) = writeln!(self.out, "{}", text) {
            warn!("report output failed: {}", e);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn loaded(&mut self, table: &Table) {
        if self.preview_rows == 0 {
            return;
        }
        let preview = render_preview(table, self.preview_rows);
        self.emit(&preview);
    }

    fn finished(&mut self, report: &FillReport) {
        let mut text = format!(
            "Filled {} cell(s) in column '{}'; the updated table has been saved to {}.",
            report.filled,
            report.column,
            report.destination.display()
        );
        if report.status == FillStatus::Incomplete {
            text.push_str(&format!(
                "\nwarning: {} leading cell(s) in '{}' had no preceding value and are still empty.",
                report.remaining_missing, report.column
            ));
        }
        self.emit(&text);
    }
}

/// Fixed-width rendering of the header and the first `rows` data rows, with a row index gutter.
pub fn render_preview(table: &Table, rows: usize) -> String {
    let shown: Vec<Vec<String>> = table
        .rows
        .iter()
        .take(rows)
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();

    let index_width = shown.len().saturating_sub(1).to_string().len();
    let widths: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .map(|(c, h)| {
            shown
                .iter()
                .map(|r| r[c].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&" ".repeat(index_width));
    for (h, w) in table.headers.iter().zip(&widths) {
        out.push_str(&format!("  {:>w$}", h, w = w));
    }
    for (i, r) in shown.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{:<w$}", i, w = index_width));
        for (v, w) in r.iter().zip(&widths) {
            out.push_str(&format!("  {:>w$}", v, w = w));
        }
    }
    out
}

/// Per-column missing-cell counts, for picking a fill target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub index: usize,
    pub name: String,
    pub missing: usize,
    /// The column starts with missing cells that a forward fill cannot reach.
    pub leading_gap: bool,
}

pub fn column_summaries(table: &Table) -> Vec<ColumnSummary> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(index, name)| ColumnSummary {
            index,
            name: name.clone(),
            missing: count_missing(table, index),
            leading_gap: table.column(index).next().is_some_and(|c| c.is_missing()),
        })
        .collect()
}
