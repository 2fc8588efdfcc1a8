// src/write.rs

use crate::{
    error::FillError,
    table::{CellValue, Table},
};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::{fs, io::Write, path::Path};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Longest worksheet name Excel accepts.
const MAX_SHEET_NAME: usize = 31;

/// Integers beyond ±2^53 do not survive as an xlsx number (f64).
const MAX_EXACT_INT: i64 = 1 << 53;

/// Write `table` as a single-sheet `.xlsx` at `dest`: header row, then data rows, no index column.
///
/// The workbook is built in memory, written to a temp file next to `dest` and renamed over it,
/// so a failed run never leaves a partial file behind. The result gets the permissions of the
/// file it replaces, or those of a freshly created file when `dest` is new.
#[tracing::instrument(level = "info", skip(table, dest), fields(path = %dest.as_ref().display()))]
pub fn write_table<P: AsRef<Path>>(table: &Table, dest: P) -> Result<(), FillError> {
    let dest = dest.as_ref();

    let buf = build_workbook(table)
        .and_then(|mut wb| wb.save_to_buffer())
        .map_err(|e| FillError::unwritable(dest, e))?;
    debug!(bytes = buf.len(), "serialized workbook");

    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = temp_file_in(dir)
        .map_err(|e| FillError::unwritable(dest, format!("creating temp file in {:?}: {}", dir, e)))?;
    if let Ok(existing) = fs::metadata(dest) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| FillError::unwritable(dest, e))?;
    }
    tmp.write_all(&buf)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| FillError::unwritable(dest, e))?;
    tmp.persist(dest)
        .map_err(|e| FillError::unwritable(dest, e.error))?;

    info!(rows = table.row_count(), "wrote table");
    Ok(())
}

/// Temp file created with the same default mode as `File::create` (0o666 less the umask).
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".sheetfill-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

fn build_workbook(table: &Table) -> Result<Workbook, XlsxError> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let rejected = ws.set_name(&table.sheet).err();
    if let Some(e) = rejected {
        let fallback = xlsx_sheet_name(&table.sheet);
        warn!(sheet = %table.sheet, fallback = %fallback, "sheet name not valid in xlsx ({}); renaming", e);
        ws.set_name(&fallback)?;
    }
    let datetime = Format::new().set_num_format(DATETIME_FORMAT);

    for (c, header) in table.headers.iter().enumerate() {
        ws.write_string(0, col_num(c)?, header)?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        let r = row_num(r + 1)?;
        for (c, cell) in row.iter().enumerate() {
            write_cell(ws, r, col_num(c)?, cell, &datetime)?;
        }
    }
    Ok(wb)
}

/// Make a sheet name from another format acceptable to xlsx: no `[]:*?/\`, no leading or
/// trailing apostrophe, at most 31 characters, not the reserved `History`.
pub fn xlsx_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if "[]:*?/\\".contains(c) { '_' } else { c })
        .collect();
    let cleaned: String = cleaned
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let cleaned = cleaned.trim_end_matches('\'');
    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("history") {
        "Sheet1".to_string()
    } else {
        cleaned.to_string()
    }
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    datetime: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Missing => return Ok(()),
        CellValue::Text(s) | CellValue::Error(s) => ws.write_string(row, col, s)?,
        CellValue::Int(n) if n.unsigned_abs() > MAX_EXACT_INT as u64 => {
            debug!(row, col, value = n, "integer too large for an xlsx number; writing as text");
            ws.write_string(row, col, n.to_string())?
        }
        CellValue::Int(n) => ws.write_number(row, col, *n as f64)?,
        CellValue::Float(n) => ws.write_number(row, col, *n)?,
        CellValue::Bool(b) => ws.write_boolean(row, col, *b)?,
        CellValue::DateTime(serial) => ws.write_number_with_format(row, col, *serial, datetime)?,
    };
    Ok(())
}

fn row_num(r: usize) -> Result<u32, XlsxError> {
    u32::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(c: usize) -> Result<u16, XlsxError> {
    u16::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)
}
