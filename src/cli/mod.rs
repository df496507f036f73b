//! Command-line parsing for the retail report generator.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about = "Retail Business Performance & Profitability Report")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate the report from a data file and print it to the terminal.
    Report(ReportArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `pulse report`, but renders
    /// the charts and narrative in a terminal UI using Ratatui.
    Tui(TuiArgs),
}

/// Options for non-interactive report generation.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    /// Input data file (.csv, .xls, or .xlsx).
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Workbook sheet to read (first sheet by default; ignored for CSV).
    #[arg(long)]
    pub sheet: Option<String>,

    /// Forecast horizon in months beyond the last observed month.
    #[arg(long, default_value_t = crate::domain::DEFAULT_HORIZON)]
    pub horizon: usize,

    /// Export the monthly table to CSV.
    #[arg(long = "export-monthly")]
    pub export_monthly: Option<PathBuf>,

    /// Export the full report (metrics + monthly + forecast) to JSON.
    #[arg(long = "export-report")]
    pub export_report: Option<PathBuf>,
}

/// Options for the interactive TUI.
#[derive(Debug, Parser, Clone)]
pub struct TuiArgs {
    /// Input data file to preload (can also be typed in the UI).
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Workbook sheet to read (first sheet by default; ignored for CSV).
    #[arg(long)]
    pub sheet: Option<String>,

    /// Forecast horizon in months beyond the last observed month.
    #[arg(long, default_value_t = crate::domain::DEFAULT_HORIZON)]
    pub horizon: usize,
}
