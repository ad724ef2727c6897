//! CSV Export Module
//! Writes the month's rows as UTF-8, comma separated CSV with a header row.

use crate::report::TableView;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// `uber_<context>_<YYYY-MM>.csv`
pub fn export_file_name(context: &str, month: &str) -> String {
    format!("uber_{}_{}.csv", context, month)
}

/// Write the header and every row of `table`.
pub fn write_csv<W: Write>(table: &TableView, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn csv_bytes(table: &TableView) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    write_csv(table, &mut buf)?;
    Ok(buf)
}

/// Save prepared CSV bytes to `path`.
pub fn save_csv(bytes: &[u8], path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "CSV exported");
    Ok(())
}
