//! Error taxonomy for report generation.
//!
//! Every stage failure is a named variant so the UI can show a specific,
//! user-readable message instead of a stack trace. Variants carry an exit
//! code for the non-interactive `report` subcommand:
//!
//! - 2: bad input (format, schema, unreadable file)
//! - 3: no usable data after preprocessing
//! - 4: internal/terminal failure

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unsupported file format '{0}'. Please use a CSV or Excel file (.csv, .xls, .xlsx).")]
    UnsupportedFormat(String),

    #[error("No date column found in the data.")]
    NoDateColumn,

    #[error("No sales column found in the data.")]
    NoSalesColumn,

    #[error("No usable rows remain after date parsing.")]
    NoData,

    #[error("Sales forecast unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("An error occurred during report generation: {0}")]
    Internal(String),
}

impl ReportError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ReportError::UnsupportedFormat(_)
            | ReportError::NoDateColumn
            | ReportError::NoSalesColumn
            | ReportError::Io { .. }
            | ReportError::Csv(_)
            | ReportError::Spreadsheet(_) => 2,
            ReportError::NoData => 3,
            ReportError::ForecastUnavailable(_)
            | ReportError::Terminal(_)
            | ReportError::Internal(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
