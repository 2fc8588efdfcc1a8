// src/load.rs

use crate::{
    error::FillError,
    table::{CellValue, Table},
};
use calamine::{open_workbook_auto, Data, Reader};
use std::{collections::HashSet, path::Path};
use tracing::{debug, info};

/// Open `path` and read one sheet (the first unless `sheet` names another) into a `Table`.
///
/// The first row of the sheet's used range is the header row. Fails with
/// `SourceUnreadable` when the workbook or sheet cannot be read and with `EmptyTable`
/// when there are no rows below the header.
#[tracing::instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_table<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Table, FillError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).map_err(|e| FillError::unreadable(path, e))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) if sheet_names.iter().any(|s| s == name) => name.to_string(),
        Some(name) => {
            return Err(FillError::unreadable(
                path,
                format!("no sheet named '{}' (found: {})", name, sheet_names.join(", ")),
            ))
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| FillError::unreadable(path, "workbook contains no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| FillError::unreadable(path, format!("sheet '{}': {}", sheet_name, e)))?;
    let (height, width) = range.get_size();
    debug!(sheet = %sheet_name, height, width, "read sheet range");

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => dedupe_headers(
            header_row
                .iter()
                .enumerate()
                .map(|(i, d)| header_name(d, i))
                .collect(),
        ),
        None => return Err(FillError::EmptyTable { sheet: sheet_name }),
    };
    let data: Vec<Vec<CellValue>> = rows.map(|r| r.iter().map(to_cell).collect()).collect();

    let table = Table::new(sheet_name, headers, data);
    if table.is_empty() {
        return Err(FillError::EmptyTable { sheet: table.sheet });
    }

    info!(
        sheet = %table.sheet,
        rows = table.row_count(),
        columns = table.width(),
        "loaded table"
    );
    Ok(table)
}

/// Map a calamine cell onto our value model without reinterpreting it.
pub fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(n) => CellValue::Int(*n),
        Data::Float(n) => CellValue::Float(*n),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

fn header_name(data: &Data, index: usize) -> String {
    match data {
        Data::Empty => format!("Unnamed: {}", index),
        Data::String(s) if s.is_empty() => format!("Unnamed: {}", index),
        // Whole-number headers such as years come back as floats.
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other.to_string(),
    }
}

/// Rename repeated headers `X` to `X.1`, `X.2`, ... so every column has a unique name.
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for name in raw {
        let mut candidate = name.clone();
        let mut n = 0;
        while seen.contains(&candidate) {
            n += 1;
            candidate = format!("{}.{}", name, n);
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{init_test_logging, write_fixture};
    use anyhow::Result;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn loads_first_sheet_with_missing_cells() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = dir.path().join("in.xlsx");
        write_fixture(
            &path,
            "Objects",
            &["Type", "Name"],
            &[
                vec![Some("Asteroid"), Some("Ceres")],
                vec![None, Some("Vesta")],
                vec![Some("002"), None],
            ],
        )?;

        let tbl = load_table(&path, None)?;
        assert_eq!(tbl.sheet, "Objects");
        assert_eq!(tbl.headers, vec!["Type", "Name"]);
        assert_eq!(tbl.row_count(), 3);
        assert_eq!(tbl.rows[1][0], CellValue::Missing);
        assert_eq!(tbl.rows[2][0], CellValue::text("002"));
        assert_eq!(tbl.rows[2][1], CellValue::Missing);
        Ok(())
    }

    #[test]
    fn picks_named_sheet_and_keeps_number_types() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("two.xlsx");
        let mut wb = Workbook::new();
        wb.add_worksheet().set_name("First")?.write_string(0, 0, "ignored")?;
        let ws = wb.add_worksheet();
        ws.set_name("Second")?;
        ws.write_string(0, 0, "Group")?;
        ws.write_string(0, 1, "Flag")?;
        ws.write_number(1, 0, 42.0)?;
        ws.write_boolean(1, 1, true)?;
        wb.save(&path)?;

        let tbl = load_table(&path, Some("Second"))?;
        assert_eq!(tbl.sheet, "Second");
        assert_eq!(tbl.rows, vec![vec![CellValue::Float(42.0), CellValue::Bool(true)]]);

        assert!(matches!(
            load_table(&path, Some("Third")),
            Err(FillError::SourceUnreadable { .. })
        ));
        Ok(())
    }

    #[test]
    fn header_only_sheet_is_empty_table() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("header_only.xlsx");
        write_fixture(&path, "Sheet1", &["Type", "Name"], &[])?;
        assert!(matches!(
            load_table(&path, None),
            Err(FillError::EmptyTable { .. })
        ));
        Ok(())
    }

    #[test]
    fn garbage_and_missing_files_are_unreadable() -> Result<()> {
        let dir = tempdir()?;
        let junk = dir.path().join("junk.xlsx");
        std::fs::write(&junk, b"definitely not a zip archive")?;
        assert!(matches!(
            load_table(&junk, None),
            Err(FillError::SourceUnreadable { .. })
        ));
        assert!(matches!(
            load_table(dir.path().join("absent.xlsx"), None),
            Err(FillError::SourceUnreadable { .. })
        ));
        Ok(())
    }

    #[test]
    fn header_normalization() {
        let raw = vec![
            header_name(&Data::String("Type".into()), 0),
            header_name(&Data::Empty, 1),
            header_name(&Data::String("Type".into()), 2),
            header_name(&Data::Float(2023.0), 3),
            header_name(&Data::String("Type".into()), 4),
        ];
        assert_eq!(
            dedupe_headers(raw),
            vec!["Type", "Unnamed: 1", "Type.1", "2023", "Type.2"]
        );
    }

    #[test]
    fn cell_mapping_keeps_representation() {
        assert_eq!(to_cell(&Data::Empty), CellValue::Missing);
        assert_eq!(to_cell(&Data::String(String::new())), CellValue::text(""));
        assert_eq!(to_cell(&Data::Int(3)), CellValue::Int(3));
        assert_eq!(
            to_cell(&Data::DateTimeIso("2024-01-02".into())),
            CellValue::text("2024-01-02")
        );
    }
}
