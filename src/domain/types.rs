//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during report generation
//! - exported to JSON/CSV
//! - reloaded later for comparisons

use std::path::PathBuf;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// The uploaded table exactly as parsed: named columns over string cells.
///
/// Column names and cell values are untrusted; all typing happens in the
/// preprocessor via heuristic column matching.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of the first column whose name contains `needle`
    /// (case-insensitive), preserving original column order.
    ///
    /// First-match semantics over the original order are load-bearing: with
    /// several candidate columns the earliest one wins, and downstream
    /// behavior depends on that tie-break.
    pub fn find_column(&self, needle: &str) -> Option<usize> {
        let needle = needle.to_ascii_lowercase();
        self.headers
            .iter()
            .position(|h| h.to_ascii_lowercase().contains(&needle))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// A row dropped or rejected during preprocessing.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub message: String,
}

/// One calendar month of aggregated activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Month-end date of the bucket.
    pub month: NaiveDate,
    /// Sum of sales in the period.
    pub sales: f64,
    /// Sum of profit in the period (observed or synthesized).
    pub profit: f64,
    /// `profit / sales`, or `None` when the month's sales sum is zero.
    ///
    /// An undefined ratio is surfaced as null rather than a fabricated value.
    pub profit_margin: Option<f64>,
}

/// Preprocessor output: the monthly series plus resolution metadata.
#[derive(Debug, Clone)]
pub struct MonthlyTable {
    /// Records ordered by month ascending.
    pub records: Vec<MonthlyRecord>,
    /// Name of the column chosen as the date column.
    pub date_column: String,
    /// Name of the column chosen as the sales column.
    pub sales_column: String,
    /// Name of the profit column, or `None` when profit was synthesized.
    pub profit_column: Option<String>,
    pub rows_read: usize,
    pub rows_used: usize,
    /// Rows lost to unparseable dates or values. The loss itself is the
    /// documented behavior; this list makes it observable.
    pub dropped: Vec<RowError>,
}

/// Scalar summary of the monthly table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Mean of per-month margins, skipping undefined months.
    ///
    /// Deliberately NOT `total_profit / total_sales`; the two differ whenever
    /// monthly sales vary.
    pub avg_profit_margin: Option<f64>,
}

/// One predicted point of the sales forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub ds: NaiveDate,
    pub yhat: f64,
}

/// Which additive model the forecaster fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendModelKind {
    /// Intercept + linear trend.
    Trend,
    /// Intercept + linear trend + month-of-year effects.
    Seasonal,
}

impl TrendModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            TrendModelKind::Trend => "trend",
            TrendModelKind::Seasonal => "trend + seasonality",
        }
    }

    /// Number of regression coefficients (intercept first).
    ///
    /// The seasonal model uses 11 month dummies with January as baseline.
    pub fn beta_len(self) -> usize {
        match self {
            TrendModelKind::Trend => 2,
            TrendModelKind::Seasonal => 13,
        }
    }
}

/// Fit quality diagnostics for a fitted trend model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastQuality {
    pub sse: f64,
    pub rmse: f64,
    pub bic: f64,
    pub n: usize,
}

/// A fitted forecast model: kind + coefficients + diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendModel {
    pub kind: TrendModelKind,
    pub betas: Vec<f64>,
    pub quality: ForecastQuality,
}

/// Forecaster output: historical fitted values plus the future horizon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesForecast {
    /// Ordered predictions covering every historical month plus `horizon`
    /// additional month-ends.
    pub points: Vec<ForecastPoint>,
    pub model: TrendModel,
    pub horizon: usize,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults) or TUI inputs.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub input: PathBuf,
    /// Workbook sheet to read; `None` means the first sheet.
    pub sheet: Option<String>,
    /// Future periods to project beyond the last observed month.
    pub horizon: usize,
    pub export_monthly: Option<PathBuf>,
    pub export_report: Option<PathBuf>,
}

/// Default forecast horizon in months.
pub const DEFAULT_HORIZON: usize = 3;

impl ReportConfig {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            sheet: None,
            horizon: DEFAULT_HORIZON,
            export_monthly: None,
            export_report: None,
        }
    }
}

/// Fixed progress checkpoints shown during report generation.
///
/// The percentages are hardcoded stage markers, not a measure of work done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Metrics,
    Forecast,
    Charts,
}

impl Stage {
    pub fn percent(self) -> u8 {
        match self {
            Stage::Loading => 20,
            Stage::Metrics => 50,
            Stage::Forecast => 75,
            Stage::Charts => 100,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Loading => "Loading data",
            Stage::Metrics => "Calculating metrics",
            Stage::Forecast => "Building forecast model",
            Stage::Charts => "Plotting trends",
        }
    }
}

/// A saved report file (JSON export).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFile {
    pub tool: String,
    pub source: PathBuf,
    pub metrics: MetricsSummary,
    pub monthly: Vec<MonthlyRecord>,
    pub forecast: Option<SalesForecast>,
}

/// Month-end of the month containing `d`.
pub fn month_end_of(d: NaiveDate) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(d.year(), d.month(), 1).unwrap_or(d);
    let next = first.checked_add_months(Months::new(1)).unwrap_or(first);
    next.pred_opt().unwrap_or(d)
}

/// Month-end `k` months after the month containing `d`.
pub fn month_end_after(d: NaiveDate, k: u32) -> NaiveDate {
    let shifted = d.checked_add_months(Months::new(k)).unwrap_or(d);
    month_end_of(shifted)
}

/// Absolute month index (year * 12 + month), used as the trend regressor.
pub fn month_index(d: NaiveDate) -> i64 {
    i64::from(d.year()) * 12 + i64::from(d.month0())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn month_end_handles_short_and_long_months() {
        assert_eq!(month_end_of(d(2023, 1, 5)), d(2023, 1, 31));
        assert_eq!(month_end_of(d(2023, 2, 1)), d(2023, 2, 28));
        assert_eq!(month_end_of(d(2024, 2, 29)), d(2024, 2, 29));
        assert_eq!(month_end_of(d(2023, 12, 31)), d(2023, 12, 31));
    }

    #[test]
    fn month_end_after_crosses_year_boundary() {
        assert_eq!(month_end_after(d(2023, 11, 30), 3), d(2024, 2, 29));
        assert_eq!(month_end_after(d(2023, 3, 31), 1), d(2023, 4, 30));
    }

    #[test]
    fn month_index_is_contiguous_across_years() {
        assert_eq!(month_index(d(2024, 1, 31)) - month_index(d(2023, 12, 31)), 1);
        assert_eq!(month_index(d(2023, 3, 15)) - month_index(d(2023, 1, 1)), 2);
    }

    #[test]
    fn find_column_prefers_first_match_in_original_order() {
        let table = RawTable {
            headers: vec![
                "OrderDate".to_string(),
                "ShipDate".to_string(),
                "Revenue".to_string(),
                "Sales".to_string(),
            ],
            rows: vec![],
        };
        assert_eq!(table.find_column("date"), Some(0));
        assert_eq!(table.find_column("sales"), Some(3));
        assert_eq!(table.find_column("profit"), None);
    }
}
