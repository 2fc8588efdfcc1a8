pub mod error;
pub mod fill;
pub mod load;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod validate;
pub mod write;

pub use error::FillError;
pub use pipeline::{run, FillPolicy, FillReport, FillRequest, FillStatus};
pub use table::{CellValue, ColumnSelector, Table};

#[cfg(test)]
pub(crate) mod test_support {
    use rust_xlsxwriter::Workbook;
    use std::path::Path;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,sheetfill=debug")),
            )
            .with_test_writer()
            .finish();
        // already set by another test
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// Write a one-sheet workbook of text cells; `None` leaves the cell blank.
    pub fn write_fixture(
        path: &Path,
        sheet: &str,
        headers: &[&str],
        rows: &[Vec<Option<&str>>],
    ) -> anyhow::Result<()> {
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.set_name(sheet)?;
        for (c, h) in headers.iter().enumerate() {
            ws.write_string(0, c as u16, *h)?;
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(v) = cell {
                    ws.write_string(r as u32 + 1, c as u16, *v)?;
                }
            }
        }
        wb.save(path)?;
        Ok(())
    }
}
