//! File loading and format dispatch.
//!
//! The loader turns an uploaded file into a `RawTable`: named columns over
//! untyped string cells. Dispatch is purely by file extension:
//!
//! - `.csv`          → delimited-text parse
//! - `.xls`/`.xlsx`  → spreadsheet parse (first sheet unless one is named)
//! - anything else   → `UnsupportedFormat`
//!
//! Content is not validated here; column inference and typing belong to the
//! preprocessor.

use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use log::debug;

use crate::domain::RawTable;
use crate::error::{ReportError, Result};

/// Load a CSV or Excel file into a raw table.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xls" | "xlsx" => load_workbook(path, sheet)?,
        _ => {
            let shown = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("(unnamed)")
                .to_string();
            return Err(ReportError::UnsupportedFormat(shown));
        }
    };

    debug!(
        "loaded '{}': {} columns, {} rows",
        path.display(),
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

fn load_csv(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let width = headers.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        // Ragged rows are padded/truncated to the header width so the
        // preprocessor can index cells by column position.
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        // The original tool assumed the first sheet; keep that default.
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReportError::Internal("Workbook contains no sheets.".to_string()))?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;

    let mut iter = range.rows();
    let headers: Vec<String> = match iter.next() {
        Some(cells) => cells.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let width = headers.len();
    let mut rows = Vec::new();
    for cells in iter {
        let mut row: Vec<String> = cells.iter().map(cell_to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}
