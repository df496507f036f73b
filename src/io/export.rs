//! Export the generated report to files.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts. Nothing is written unless the user asks for it; report data is
//! otherwise request-scoped.

use std::fs::File;
use std::path::Path;

use crate::domain::{MonthlyTable, ReportFile};
use crate::error::{ReportError, Result};

/// Write the monthly table to a CSV file.
///
/// Months with an undefined profit margin serialize as an empty field.
pub fn write_monthly_csv(path: &Path, monthly: &MonthlyTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in &monthly.records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Write the full report (metrics + monthly + forecast) as JSON.
pub fn write_report_json(path: &Path, report: &ReportFile) -> Result<()> {
    let file = File::create(path).map_err(|e| ReportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| ReportError::Internal(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}
